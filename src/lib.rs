pub mod model;
pub mod package;
pub mod serialize;
pub mod specs;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

use serde_json::{json, Value};

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> anyhow::Result<()> {
    let mut acted = false;

    if args.lint_specs {
        acted = true;
        let dupes = specs::duplicate_templates();
        if dupes.is_empty() {
            println!("No duplicate templates in the block-spec catalog.");
        } else {
            println!(
                "{} duplicate template(s); lookup resolves each to its first entry:",
                dupes.len()
            );
            for template in dupes {
                let selectors = specs::BLOCK_SPECS
                    .iter()
                    .filter(|s| s.template == template)
                    .map(|s| s.selector)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  '{}' -> {}", template, selectors);
            }
        }
    }

    if let Some(pattern) = &args.find {
        acted = true;
        let re = regex::Regex::new(pattern)?;
        let mut hits = 0;
        for entry in specs::BLOCK_SPECS {
            if re.is_match(entry.template) || re.is_match(entry.selector) {
                println!(
                    "{:>2}  {:<44} {}",
                    entry.shape.code(),
                    entry.template,
                    entry.selector
                );
                hits += 1;
            }
        }
        if hits == 0 {
            eprintln!("No catalog entries match '{}'.", pattern);
        }
    }

    if args.list_specs {
        acted = true;
        println!("{}", serde_json::to_string_pretty(&catalog_value())?);
    }

    if let Some(output) = &args.demo {
        acted = true;
        let project = demo_project()?;
        package::write_sb2(&project, std::path::Path::new("."), output)?;
        eprintln!("Wrote demonstration project to '{}'.", output.display());
    }

    if !acted {
        anyhow::bail!("Nothing to do. Pass --list-specs, --find, --lint-specs, or --demo.");
    }
    Ok(())
}

/// The block-spec catalog as a JSON array of {template, shape, selector}.
pub fn catalog_value() -> Value {
    Value::Array(
        specs::BLOCK_SPECS
            .iter()
            .map(|s| {
                json!({
                    "template": s.template,
                    "shape": s.shape.code(),
                    "selector": s.selector
                })
            })
            .collect(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_project() -> anyhow::Result<model::Project> {
    use model::{Arg, Block, Comment, Project, Script};

    let mut project = Project::new();
    {
        let stage = project.create_stage();
        stage.scriptable.define_variable("score", 0);
        stage
            .scriptable
            .add_comment(Comment::new(10.0, 10.0, 200.0, 80.0, "Built with sb2-rs."));
    }
    let square = Script::new(
        40.0,
        40.0,
        vec![
            Block::nullary("when @greenFlag clicked")?,
            Block::new(
                "repeat %n",
                vec![
                    Arg::from(4),
                    Arg::from(Script::new(
                        0.0,
                        0.0,
                        vec![
                            Block::new("move %n steps", vec![Arg::from(100)])?,
                            Block::new("turn @turnRight %n degrees", vec![Arg::from(90)])?,
                        ],
                    )),
                ],
            )?,
        ],
    );
    let sprite = project.create_sprite("Sprite1");
    sprite.scriptable.add_script(square);
    Ok(project)
}
