use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;

pub const SITE_ROOT: &str = "https://boardgamearena.com";

// The request token travels in a cookie whose name varies per deployment but
// always contains this substring.
const TOKEN_COOKIE_MARKER: &str = "TournoiEnLigneidt";

static PLAYER_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://en\.boardgamearena\.com/player\?id=(\d+)").expect("player id pattern")
});

/// Everything later requests need, captured once at startup and never
/// refreshed.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub cookie_header: String,
    pub request_token: Option<String>,
    pub player_id: String,
}

/// Seam for the interactive login so the driver can be exercised without a
/// human at the keyboard.
pub trait CredentialProvider {
    fn obtain(&mut self, client: &Client) -> Result<SessionCredentials>;
}

/// Interactive flow: the operator logs in with their own browser and pastes
/// the resulting cookie header here. Blocks on stdin with no timeout.
pub struct ConsoleLogin;

impl CredentialProvider for ConsoleLogin {
    fn obtain(&mut self, client: &Client) -> Result<SessionCredentials> {
        let cookie_header = prompt_cookie_header()?;
        let request_token = extract_request_token(&cookie_header);
        if request_token.is_none() {
            // Not fatal: requests go out with an empty token and the server
            // rejects them.
            println!("[WARN] no {TOKEN_COOKIE_MARKER} cookie in the pasted header");
        }

        let player_id = resolve_player_id(client, &cookie_header)?
            .ok_or_else(|| anyhow!("could not determine player id from {SITE_ROOT}/player"))?;

        Ok(SessionCredentials {
            cookie_header,
            request_token,
            player_id,
        })
    }
}

fn prompt_cookie_header() -> Result<String> {
    println!("Log in at {SITE_ROOT} in your browser.");
    println!("Then copy the Cookie header from any authenticated request");
    println!("(devtools > Network > request headers) and paste it below.");
    print!("Cookie: ");
    io::stdout().flush().context("failed flushing prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed reading cookie header from stdin")?;

    let trimmed = line.trim();
    let trimmed = trimmed
        .strip_prefix("Cookie:")
        .or_else(|| trimmed.strip_prefix("cookie:"))
        .unwrap_or(trimmed)
        .trim();
    Ok(trimmed.to_string())
}

/// Value of the first cookie whose name contains the token marker, if any.
pub fn extract_request_token(cookie_header: &str) -> Option<String> {
    for pair in cookie_header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        if name.trim().contains(TOKEN_COOKIE_MARKER) {
            return Some(value.trim().to_string());
        }
    }
    None
}

fn resolve_player_id(client: &Client, cookie_header: &str) -> Result<Option<String>> {
    println!("[INFO] resolving player id from {SITE_ROOT}/player");
    let resp = client
        .get(format!("{SITE_ROOT}/player"))
        .header("accept", "text/html")
        .header("upgrade-insecure-requests", "1")
        .header("cookie", cookie_header)
        .header("referer", format!("{SITE_ROOT}/"))
        .send()
        .context("player page request failed")?;

    let status = resp.status();
    if !status.is_success() {
        println!("[WARN] player page returned http {status}");
        return Ok(None);
    }
    let body = resp.text().context("failed reading player page body")?;
    Ok(extract_player_id(&body))
}

/// The player page embeds an absolute link to the viewer's own profile; the
/// numeric id in it identifies the logged-in account.
pub fn extract_player_id(html: &str) -> Option<String> {
    PLAYER_ID_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}
