use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use trellis_engine::logging::{init_logging, LoggingConfig};
use trellis_engine::{DetectedPoint, DropPosition, FrameEditor, FrameTemplates, TemplateKind};
use trellis_script::{encode, is_child_slot_name, FrameId};
use trellis_stack::Document;

/// Load a frame package, optionally drop a template into its first frame,
/// and print every frame as frame script.
#[derive(Parser, Debug)]
#[command(name = "trellis-studio", version)]
struct Cli {
    /// Package directory containing manifest.json
    package: PathBuf,

    /// Save the (possibly edited) document into this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Frame id to drop onto
    #[arg(long, requires = "position")]
    target: Option<FrameId>,

    /// Where to drop relative to the target: center, top, bottom, left, right
    #[arg(long, requires = "target")]
    position: Option<DropPosition>,

    /// Template to drop: box, hbox, button, image
    #[arg(long, default_value = "button")]
    template: TemplateKind,

    /// Slot name for the dropped frame; defaults to the template name
    #[arg(long, value_parser = parse_slot_name)]
    name: Option<String>,

    /// Log filter, e.g. "debug" or "trellis_engine=debug"
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..LoggingConfig::default() });

    let mut doc = Document::load(&cli.package)
        .with_context(|| format!("loading package {}", cli.package.display()))?;

    for index in 0..doc.len() {
        let Some(frame) = doc.frame_mut(index) else { continue };
        let mut editor = FrameEditor::new(std::mem::take(frame));

        if index == 0 {
            if let (Some(target), Some(position)) = (cli.target, cli.position) {
                drop_template(&mut editor, &cli, target, position)?;
            }
        }
        *frame = editor.into_root();
    }

    for rec in doc.stack() {
        println!("// {}", rec.path);
        print!("{}", encode(&rec.frame));
    }

    if let Some(out) = &cli.out {
        doc.save_to(out).with_context(|| format!("saving to {}", out.display()))?;
        log::info!("wrote {}", out.display());
    }
    Ok(())
}

fn parse_slot_name(name: &str) -> Result<String, String> {
    if is_child_slot_name(name) {
        Ok(name.to_string())
    } else {
        Err(format!("`{name}` is not a slot name (letters, digits and `_`, not starting with a digit)"))
    }
}

fn drop_template(editor: &mut FrameEditor, cli: &Cli, target: FrameId, position: DropPosition) -> Result<()> {
    let template = FrameTemplates::builtin()
        .get(cli.template)
        .with_context(|| format!("loading {} template", cli.template))?;
    let name = cli.name.as_deref().unwrap_or(cli.template.slot_name());
    let detected = DetectedPoint::new(target, position);

    match editor.drop_frame(name, template, detected) {
        Ok(id) => {
            log::info!("inserted `{name}` as frame {id}");
            Ok(())
        }
        Err(e) if e.is_invariant_violation() => bail!("frame tree is inconsistent: {e}"),
        Err(e) => Err(e).with_context(|| format!("dropping `{name}` onto {detected}")),
    }
}
