//! Scripts for output pages embedded in a host site.
//!
//! An output page runs inside an iframe on the customer's site. The page
//! reports its height and asks for redirects with `postMessage`; the host
//! snippet listens for those messages and acts on them.

pub mod inject;
pub mod redirect;
pub mod snippet;

use thiserror::Error;

use crate::interpolate::InterpolationError;

pub use inject::inject_script;
pub use redirect::{RedirectOptions, RedirectUrl, build_redirect_url, redirect_script};
pub use snippet::{SnippetOptions, iframe_snippet};

/// Prefix of the `type` field of every message, e.g. `magnet:resize`.
pub const DEFAULT_MESSAGE_PREFIX: &str = "magnet";

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("invalid redirect url '{0}': {1}")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("unsupported redirect scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Messages an embedded page sends to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Resize,
    Redirect,
}

impl MessageKind {
    #[must_use]
    pub fn message_type(self, prefix: &str) -> String {
        let kind = match self {
            MessageKind::Resize => "resize",
            MessageKind::Redirect => "redirect",
        };
        format!("{prefix}:{kind}")
    }
}

/// Script that keeps the host iframe as tall as the page.
#[must_use]
pub fn resize_script(message_type: &str) -> String {
    format!(
        r#"<script>
(function () {{
  var report = function () {{
    if (window.parent && window.parent !== window) {{
      window.parent.postMessage({{ type: {kind}, height: document.body.scrollHeight }}, "*");
    }}
  }};
  window.addEventListener("load", report);
  window.addEventListener("resize", report);
}})();
</script>"#,
        kind = js_string(message_type),
    )
}

/// A JavaScript string literal that is safe inside a `<script>` element.
pub(crate) fn js_string(s: &str) -> String {
    // serde_json cannot fail on a plain string
    let quoted = serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""));
    quoted.replace("</", "<\\/")
}
