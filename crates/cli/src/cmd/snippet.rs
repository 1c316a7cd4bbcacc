use magnetvars_core::embed::{SnippetOptions, iframe_snippet};
use url::Url;

use super::fail;
use crate::SnippetArgs;

pub fn run(args: &SnippetArgs) {
    let src = match Url::parse(&args.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        Ok(url) => fail("snippet", format!("unsupported url scheme '{}'", url.scheme())),
        Err(e) => fail("snippet", format!("invalid url '{}': {e}", args.url)),
    };

    let options = SnippetOptions {
        id: args.id.clone(),
        height: args.height,
        message_prefix: args.message_prefix.clone(),
    };
    println!("{}", iframe_snippet(&src, &options));
}
