// ABOUTME: Manifest scaffolding for new projects.
// ABOUTME: Creates dockhand.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{MANIFEST_FILENAME, Manifest};

pub fn init_manifest(
    dir: &Path,
    name: Option<&str>,
    image: Option<&str>,
    force: bool,
) -> Result<()> {
    let manifest_path = dir.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !force {
        return Err(Error::AlreadyExists(manifest_path));
    }

    let mut manifest = Manifest::template();

    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(Error::InvalidManifest(
                "container names cannot be blank".to_string(),
            ));
        }
        manifest.containers.head.name = name.to_string();
    }

    if let Some(image) = image {
        manifest.containers.head.image = Some(image.to_string());
    }

    let yaml = generate_template_yaml(&manifest);
    std::fs::write(&manifest_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(manifest: &Manifest) -> String {
    let first = manifest.containers.first();
    format!(
        r#"containers:
  - name: {}
    image: {}
    ports: "8080:80"
    # environment: "KEY=value;OTHER=value"
    # command: "sleep,9999"
    # monitored: true
    # monitoring_interval: 30s

# networks:
#   - name: backbone
#     subnet: 10.67.79.0/24

# links:
#   web: [db]

# attachments:
#   - container: web
#     network: backbone
"#,
        first.name,
        first.image.as_deref().unwrap_or("nginx:latest"),
    )
}
