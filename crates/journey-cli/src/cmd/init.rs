use anyhow::{bail, Context};
use journey_core::config::{BackendConfig, Config};
use journey_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path, backend: &str, name: Option<&str>) -> anyhow::Result<()> {
    let Some(backend) = BackendConfig::from_name(backend) else {
        bail!("unknown backend '{backend}': expected kv, redb or memory");
    };
    let name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "journey".to_string())
    });

    println!("Initializing journey in: {}", root.display());

    let dir = paths::journey_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    if config_path.exists() {
        let existing = Config::load(root).context("failed to read config.yaml")?;
        println!(
            "  exists:  .journey/config.yaml (backend: {})",
            existing.backend.name()
        );
        return Ok(());
    }

    let mut config = Config::new(name);
    config.backend = backend;
    config.save(root).context("failed to write config.yaml")?;
    println!("  created: .journey/config.yaml (backend: {})", config.backend.name());

    if let BackendConfig::Redb { file } = &config.backend {
        // Opening creates the file and its tables.
        journey_core::backend::RedbBackend::open(&paths::redb_path(root, file))
            .context("failed to create database")?;
        println!("  created: .journey/{file}");
    }

    for w in config.validate() {
        println!("  {:?}: {}", w.level, w.message);
    }
    Ok(())
}
