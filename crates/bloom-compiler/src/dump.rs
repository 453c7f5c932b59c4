//! Rewrite dump: a plain-text listing of the stratified program.
//!
//! ```text
//! Declarations:
//! R[0]:
//! link <= edge.map { |e| e }
//! R[1]:
//! R[2]:
//! pipe_out <+ pipe
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use bloom_types::StratifiedProgram;
use tracing::info;

use crate::error::{CompileError, CompileResult};

/// Where the dump for `program_name` goes inside `dir`. The name must be a
/// single plain path component so the dump never lands outside `dir`.
pub fn dump_path(dir: &Path, program_name: &str) -> CompileResult<PathBuf> {
    let file_name = format!("{}_rewritten.txt", program_name);
    let mut components = Path::new(&file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !program_name.contains(['/', '\\']) => {
            Ok(dir.join(file_name))
        }
        _ => Err(CompileError::DumpName(program_name.to_string())),
    }
}

/// Render the dump text.
pub fn render_dump(program: &StratifiedProgram) -> String {
    let mut out = String::from("Declarations:\n");
    for group in &program.groups {
        out.push_str(&format!("R[{}]:\n", group.index));
        for text in group.rendered() {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

/// Write the dump for `program_name` into `dir`, replacing any previous one.
pub fn write_dump(
    dir: &Path,
    program_name: &str,
    program: &StratifiedProgram,
) -> CompileResult<PathBuf> {
    let path = dump_path(dir, program_name)?;
    let io_err = |source| CompileError::Dump {
        path: path.clone(),
        source,
    };

    {
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(render_dump(program).as_bytes())
            .map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }

    info!(path = %path.display(), groups = program.len(), "Rewrite dump written");
    Ok(path)
}
