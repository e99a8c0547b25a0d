// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json

use std::process::ExitCode;
use tenantry_control_plane::openapi::ApiDoc;

fn main() -> ExitCode {
    match ApiDoc::to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize OpenAPI spec: {e}");
            ExitCode::FAILURE
        }
    }
}
