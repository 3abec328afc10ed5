use super::{describe, json_pretty, EXIT_SUCCESS};
use aciforge_core::{extract_manifest, full_name};
use std::path::Path;

pub fn run(aci: &Path, json: bool) -> Result<u8, String> {
    let manifest = extract_manifest(aci).map_err(|e| describe(&e))?;
    if json {
        println!("{}", json_pretty(&manifest)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("name:         {}", manifest.name);
    println!("full_name:    {}", full_name(&manifest));
    for label in &manifest.labels {
        println!("label:        {}={}", label.name, label.value);
    }
    for annotation in &manifest.annotations {
        println!("annotation:   {}={}", annotation.name, annotation.value);
    }
    if let Some(app) = &manifest.app {
        println!("exec:         {}", app.exec.join(" "));
        println!("user:group:   {}:{}", app.user, app.group);
        for handler in &app.event_handlers {
            println!("event:        {} -> {}", handler.name, handler.exec.join(" "));
        }
    }
    for dep in &manifest.dependencies {
        match dep.labels.get("version") {
            Some(v) => println!("dependency:   {}:{v}", dep.image_name),
            None => println!("dependency:   {}", dep.image_name),
        }
    }
    Ok(EXIT_SUCCESS)
}
