//! `cocorabot doctor` — Diagnose configuration and knowledge-base health.

use cocorabot_config::AppConfig;
use cocorabot_knowledge::KnowledgeBase;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Cocorabot Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ℹ️  No config file at {} — using defaults", config_path.display());
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");

            if config.has_api_key() {
                println!("  ✅ API key configured");
            } else {
                println!(
                    "  ❌ No API key — set COCORABOT_API_KEY or GEMINI_API_KEY, \
                     or add api_key to config.toml"
                );
                issues += 1;
            }

            match &config.knowledge.path {
                Some(path) if !path.exists() => {
                    println!("  ❌ Knowledge path does not exist: {}", path.display());
                    issues += 1;
                }
                Some(path) => match KnowledgeBase::load(path) {
                    Ok(base) => {
                        println!(
                            "  ✅ Knowledge base loads: {} entries from {}",
                            base.len(),
                            path.display()
                        );
                        if base.is_empty() {
                            println!("  ⚠️  Knowledge base is empty");
                            issues += 1;
                        }
                    }
                    Err(e) => {
                        println!("  ❌ Knowledge base failed to load: {e}");
                        issues += 1;
                    }
                },
                None => {
                    println!("  ⚠️  No knowledge path configured — answers come from the model only");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
