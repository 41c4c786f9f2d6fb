//! `qdesk import`

use qdesk_doc::extract;

use crate::api::ApiClient;
use crate::cli::ImportArgs;
use crate::config::QdeskConfig;
use crate::error::{CliError, CliResult};

pub async fn run(args: &ImportArgs, config: &QdeskConfig) -> CliResult<()> {
    let bytes = std::fs::read(&args.file).map_err(|source| CliError::ReadFile {
        path: args.file.clone(),
        source,
    })?;

    // Nothing is written or submitted unless extraction fully succeeds
    let template = extract(&bytes)?;
    let json = serde_json::to_string_pretty(&template)?;

    match &args.out {
        Some(out) => {
            super::write_file(out, json.as_bytes())?;
            tracing::info!(path = %out.display(), "Wrote quotation template");
        }
        None if !args.submit => println!("{json}"),
        None => {}
    }

    if args.submit {
        let server = config.server_url().ok_or(CliError::MissingServerUrl)?;
        let client = ApiClient::new(reqwest::Client::new(), server, config.server.token.clone());
        let response = client.create_quotation(&template).await?;

        let created = response
            .result
            .as_ref()
            .and_then(|r| r.get("refNo").or_else(|| r.get("_id")))
            .and_then(|v| v.as_str());
        match created {
            Some(id) => println!("Quotation imported successfully ({id})"),
            None => println!(
                "{}",
                response.message.as_deref().unwrap_or("Quotation imported successfully")
            ),
        }
    }

    Ok(())
}
