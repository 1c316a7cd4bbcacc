//! Host-page side of an embedded output.

use url::Url;

use super::{DEFAULT_MESSAGE_PREFIX, MessageKind, js_string};
use crate::interpolate::formatters::html_escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOptions {
    /// `id` attribute of the iframe.
    pub id: String,
    /// Initial height in pixels, until the first resize message.
    pub height: u32,
    pub message_prefix: String,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self { id: "magnet-frame".to_string(), height: 600, message_prefix: DEFAULT_MESSAGE_PREFIX.to_string() }
    }
}

/// HTML to paste into the host page: the iframe and a message listener.
///
/// The listener ignores messages from any origin but the iframe's, resizes
/// the frame on `<prefix>:resize` and navigates the host on
/// `<prefix>:redirect`.
#[must_use]
pub fn iframe_snippet(src: &Url, options: &SnippetOptions) -> String {
    format!(
        r#"<iframe id="{id_attr}" src="{src_attr}" style="width:100%;border:0;" height="{height}" loading="lazy"></iframe>
<script>
(function () {{
  var frame = document.getElementById({id});
  window.addEventListener("message", function (event) {{
    if (event.origin !== {origin} || !event.data) return;
    if (event.data.type === {resize} && event.data.height) {{
      frame.style.height = event.data.height + "px";
    }} else if (event.data.type === {redirect} && event.data.url) {{
      window.location.href = event.data.url;
    }}
  }});
}})();
</script>"#,
        id_attr = html_escape(&options.id),
        src_attr = html_escape(src.as_str()),
        height = options.height,
        id = js_string(&options.id),
        origin = js_string(&src.origin().ascii_serialization()),
        resize = js_string(&MessageKind::Resize.message_type(&options.message_prefix)),
        redirect = js_string(&MessageKind::Redirect.message_type(&options.message_prefix)),
    )
}
