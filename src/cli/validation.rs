use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.base_url.as_deref() {
        let url = reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --url '{raw}': {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!("invalid --url '{raw}': expected http or https"));
        }
    }
    if let Some(event) = args.event_id.as_deref() {
        if event.trim().is_empty() || event.contains('/') {
            return Err(format!("invalid --event '{event}'"));
        }
    }
    if args.page.is_some() && args.location.is_some() {
        return Err("use either --page or --location, not both".to_string());
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(retries) = args.retries {
        if retries > 10 {
            return Err("invalid --retries, expected at most 10".to_string());
        }
    }
    if let Some(debounce) = args.debounce_ms {
        if debounce > 60_000 {
            return Err("invalid --debounce-ms, expected at most 60000".to_string());
        }
    }
    Ok(())
}
