//! Dynamic redirects out of an embedded output page.

use url::Url;

use super::{DEFAULT_MESSAGE_PREFIX, EmbedError, MessageKind, js_string};
use crate::interpolate::{Escaping, InterpolationOptions, VariableInterpolator};
use crate::vars::value::VariableMap;

/// A redirect target after interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrl {
    pub url: Url,
    pub unresolved_variables: Vec<String>,
}

/// Build a redirect URL from a template like
/// `https://shop.example/checkout?plan=@plan&email=@email`.
///
/// Values are URL-encoded. Only `http` and `https` targets are accepted.
pub fn build_redirect_url(
    url_template: &str,
    vars: &VariableMap,
    options: &InterpolationOptions,
) -> Result<RedirectUrl, EmbedError> {
    let options = options.clone().with_escaping(Escaping::Url);
    let rendered = VariableInterpolator::new(options)?.interpolate(url_template, vars);

    let url = Url::parse(rendered.content.trim())
        .map_err(|e| EmbedError::InvalidUrl(rendered.content.clone(), e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(EmbedError::UnsupportedScheme(other.to_string())),
    }

    tracing::debug!(url = %url, unresolved = rendered.unresolved_variables.len(), "built redirect url");
    Ok(RedirectUrl { url, unresolved_variables: rendered.unresolved_variables })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectOptions {
    /// `type` field of the message posted to the host page.
    pub message_type: String,
    /// Wait before redirecting, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self::for_prefix(DEFAULT_MESSAGE_PREFIX)
    }
}

impl RedirectOptions {
    #[must_use]
    pub fn for_prefix(prefix: &str) -> Self {
        Self { message_type: MessageKind::Redirect.message_type(prefix), delay_ms: 0 }
    }

    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Script that sends the visitor to `url`.
///
/// Inside an iframe it asks the host page to navigate, so the whole page
/// leaves rather than just the frame. Loaded directly, it navigates itself.
#[must_use]
pub fn redirect_script(url: &Url, options: &RedirectOptions) -> String {
    let go = if options.delay_ms == 0 {
        "  go();".to_string()
    } else {
        format!("  setTimeout(go, {});", options.delay_ms)
    };
    format!(
        r#"<script>
(function () {{
  var url = {url};
  var go = function () {{
    if (window.parent && window.parent !== window) {{
      window.parent.postMessage({{ type: {kind}, url: url }}, "*");
    }} else {{
      window.location.href = url;
    }}
  }};
{go}
}})();
</script>"#,
        url = js_string(url.as_str()),
        kind = js_string(&options.message_type),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::value::VarValue;

    fn vars() -> VariableMap {
        let mut vars = VariableMap::new();
        vars.insert("plan".into(), VarValue::from("pro plus"));
        vars.insert("email".into(), VarValue::from("ann@example.com"));
        vars
    }

    #[test]
    fn test_build_redirect_url_encodes_values() {
        let redirect = build_redirect_url(
            "https://shop.example/checkout?plan=@plan&email=@email",
            &vars(),
            &InterpolationOptions::default(),
        )
        .unwrap();
        assert_eq!(
            redirect.url.as_str(),
            "https://shop.example/checkout?plan=pro+plus&email=ann%40example.com"
        );
        assert!(redirect.unresolved_variables.is_empty());
        assert_eq!(redirect.url.query_pairs().next().unwrap().1, "pro plus");
    }

    #[test]
    fn test_build_redirect_url_reports_unresolved() {
        let redirect = build_redirect_url(
            "https://shop.example/?ref=@ref",
            &vars(),
            &InterpolationOptions::default().with_placeholder(""),
        )
        .unwrap();
        assert_eq!(redirect.url.as_str(), "https://shop.example/?ref=");
        assert_eq!(redirect.unresolved_variables, vec!["ref"]);
    }

    #[test]
    fn test_build_redirect_url_rejects_bad_targets() {
        let opts = InterpolationOptions::default();
        assert!(matches!(
            build_redirect_url("javascript:alert(1)", &vars(), &opts),
            Err(EmbedError::UnsupportedScheme(s)) if s == "javascript"
        ));
        assert!(matches!(
            build_redirect_url("not a url @plan", &vars(), &opts),
            Err(EmbedError::InvalidUrl(..))
        ));
    }

    #[test]
    fn test_redirect_script() {
        let url = Url::parse("https://shop.example/done?x=1").unwrap();
        insta::assert_snapshot!(redirect_script(&url, &RedirectOptions::default()), @r#"
        <script>
        (function () {
          var url = "https://shop.example/done?x=1";
          var go = function () {
            if (window.parent && window.parent !== window) {
              window.parent.postMessage({ type: "magnet:redirect", url: url }, "*");
            } else {
              window.location.href = url;
            }
          };
          go();
        })();
        </script>
        "#);
    }

    #[test]
    fn test_redirect_script_with_delay_and_prefix() {
        let url = Url::parse("https://shop.example/").unwrap();
        let script = redirect_script(&url, &RedirectOptions::for_prefix("quiz").with_delay(1500));
        assert!(script.contains("setTimeout(go, 1500);"));
        assert!(script.contains(r#"type: "quiz:redirect""#));
    }

    #[test]
    fn test_redirect_script_cannot_close_script_tag() {
        let url = Url::parse("https://shop.example/?q=</script><b>").unwrap();
        let script = redirect_script(&url, &RedirectOptions::default());
        assert_eq!(script.matches("</script>").count(), 1);
    }
}
