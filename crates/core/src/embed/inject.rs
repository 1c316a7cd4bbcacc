/// Insert `script` into an HTML document.
///
/// The script goes before the last `</body>`, or before the last `</html>`
/// when there is no body close tag, or at the end otherwise. Tag matching
/// ignores ASCII case.
#[must_use]
pub fn inject_script(html: &str, script: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let at = lower.rfind("</body>").or_else(|| lower.rfind("</html>"));

    let mut out = String::with_capacity(html.len() + script.len() + 1);
    match at {
        Some(at) => {
            out.push_str(&html[..at]);
            out.push_str(script);
            if !script.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&html[at..]);
        }
        None => {
            out.push_str(html);
            if !html.is_empty() && !html.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(script);
        }
    }
    out
}
