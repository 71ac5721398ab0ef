// Prints the OpenAPI document of each service.
// Usage: cargo run --bin openapi_export -- [address|order]

use anyhow::{bail, Context, Result};
use utoipa::OpenApi;

use catpang::api::openapi::{AddressApiDoc, OrderApiDoc};

fn main() -> Result<()> {
    let which = std::env::args().nth(1);

    let documents = match which.as_deref() {
        None => vec![AddressApiDoc::openapi(), OrderApiDoc::openapi()],
        Some("address") => vec![AddressApiDoc::openapi()],
        Some("order") => vec![OrderApiDoc::openapi()],
        Some(other) => bail!("Unknown service '{}', expected 'address' or 'order'", other),
    };

    for document in documents {
        let json = document
            .to_pretty_json()
            .context("Failed to serialize OpenAPI document")?;
        println!("{}", json);
    }

    Ok(())
}
