//! adf.ly interstitials: the destination hides in the `ysmm` script variable.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

use crate::handlers::{Action, Handler, SiteContext, UrlPattern};

pub fn handler() -> Handler {
    Handler::new(
        "adfly",
        UrlPattern::regex(r"^https?://(www\.)?(adf\.ly|j\.gs|q\.gs)/"),
    )
    .on_ready(Action::invoke(ready))
}

async fn ready(cx: SiteContext) -> Result<()> {
    let re = Regex::new(r"var ysmm = '([^']+)'")?;
    let payload = cx
        .page
        .search_scripts(&re)
        .context("ysmm payload not found in page scripts")?;
    let target = decode_ysmm(&payload)?;
    cx.page.navigate(&target)?;
    Ok(())
}

/// The payload interleaves a base64 string: characters at even positions in
/// order, characters at odd positions reversed and appended. The decoded
/// string carries two junk characters before the destination URL.
fn decode_ysmm(payload: &str) -> Result<String> {
    let mut forward = String::new();
    let mut backward = String::new();
    for (i, ch) in payload.chars().enumerate() {
        if i % 2 == 0 {
            forward.push(ch);
        } else {
            backward.insert(0, ch);
        }
    }
    forward.push_str(&backward);

    let decoded = STANDARD
        .decode(forward)
        .context("ysmm payload is not valid base64")?;
    let decoded = String::from_utf8(decoded).context("ysmm payload decodes to non-UTF-8")?;

    let url = decoded.get(2..).unwrap_or("");
    if !url.starts_with("http") {
        anyhow::bail!("ysmm payload did not decode to a URL: {url:?}");
    }
    Ok(url.to_string())
}
