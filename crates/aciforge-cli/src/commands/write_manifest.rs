use super::{describe, json_pretty, EXIT_SUCCESS};
use aciforge_core::{parse_spec_file, write_manifest};
use std::path::Path;

pub fn run(spec_path: &Path, output: &Path, name: Option<&str>, json: bool) -> Result<u8, String> {
    let spec = parse_spec_file(spec_path).map_err(|e| describe(&e))?;
    let project_name = name.unwrap_or_else(|| spec.name());

    write_manifest(&spec, output, project_name).map_err(|e| describe(&e))?;

    if json {
        let payload = serde_json::json!({
            "name": project_name,
            "version": spec.version(),
            "output": output.display().to_string(),
            "status": "written"
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote manifest for {project_name} to {}", output.display());
    }
    Ok(EXIT_SUCCESS)
}
