use super::{describe, json_pretty, EXIT_SUCCESS};
use aciforge_core::{extract_manifest, full_name};
use std::path::Path;

pub fn run(aci: &Path, json: bool) -> Result<u8, String> {
    let manifest = extract_manifest(aci).map_err(|e| describe(&e))?;
    let name = full_name(&manifest);
    if json {
        let payload = serde_json::json!({ "full_name": name });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{name}");
    }
    Ok(EXIT_SUCCESS)
}
