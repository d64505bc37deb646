use super::{FeatureContext, listener};
use crate::Result;
use crate::bootstrap::FeatureOutcome;
use crate::host::{EventTarget, Host};

/// Grey "Bild nicht verfügbar" tile shown in place of a broken image.
pub(crate) const PLACEHOLDER_SRC: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIyMDAiIGhlaWdodD0iMjAwIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZjhmOWZhIi8+PHRleHQgeD0iNTAlIiB5PSI1MCUiIGZvbnQtZmFtaWx5PSJBcmlhbCIgZm9udC1zaXplPSIxNCIgZmlsbD0iIzZjNzU3ZCIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZHk9Ii4zZW0iPkJpbGQgbmljaHQgdmVyZsO8Z2JhcjwvdGV4dD48L3N2Zz4=";

pub(crate) fn init(host: &mut dyn Host, _ctx: &FeatureContext) -> Result<FeatureOutcome> {
    let images = host.query_selector_all("img")?;
    if images.is_empty() {
        return Ok(FeatureOutcome::Skipped("no images"));
    }

    for image in images {
        if host.attr(image, "loading").is_none() {
            host.set_attr(image, "loading", "lazy")?;
        }
        host.add_event_listener(
            EventTarget::Node(image),
            "error",
            listener(move |host, _event| {
                // A failing placeholder is left alone.
                if host.attr(image, "src").as_deref() == Some(PLACEHOLDER_SRC) {
                    return Ok(());
                }
                host.set_attr(image, "src", PLACEHOLDER_SRC)
            }),
        );
    }

    Ok(FeatureOutcome::Installed)
}
