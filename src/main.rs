use std::fs::File;
use std::io::{Seek, SeekFrom};

use anyhow::{Context, Result};
use tracing::info;

use riffpull::{cli, logging, ByteSource, RiffError, RiffReader};

fn main() -> Result<()> {
    let opts = cli::parse();
    logging::init_logging_with_format(opts.log_format);

    let mut file = File::open(&opts.input)
        .with_context(|| format!("failed to open {}", opts.input.display()))?;
    let total = file.metadata()?.len();
    if opts.offset > 0 {
        file.seek(SeekFrom::Start(opts.offset))?;
    }
    let size = total.saturating_sub(opts.offset);

    let mut reader = RiffReader::open_file(&mut file, size)
        .with_context(|| format!("not a readable RIFF container: {}", opts.input.display()))?;
    if opts.quiet {
        reader.silence();
    }

    if opts.validate {
        reader.file_validate().context("structure validation failed")?;
        if reader.last_warning().is_some() {
            info!("structure valid, with stray trailing bytes");
        }
        println!("{}: structure valid", opts.input.display());
        return Ok(());
    }

    if opts.count {
        let total = reader.count_chunks_in_level()?;
        println!("{total} chunks in top level");
        return Ok(());
    }

    println!(
        "{}: {} [0..{}]",
        reader.list_id(),
        reader.list_size(),
        reader.list_size() + riffpull::CHUNK_DATA_OFFSET
    );
    println!("  form: {}", reader.list_form());
    let stats = dump_level(&mut reader, 1)?;
    info!(chunks = stats.chunks, lists = stats.lists, "traversal done");
    Ok(())
}

#[derive(Default)]
struct TreeStats {
    chunks: u64,
    lists: u64,
}

/// Walk the current level, printing one line per chunk and recursing
/// into every sub list.
fn dump_level<S: ByteSource>(reader: &mut RiffReader<S>, depth: usize) -> Result<TreeStats> {
    let mut stats = TreeStats::default();
    let indent = "  ".repeat(depth);
    loop {
        stats.chunks += 1;
        let data_start = reader.chunk_start() + riffpull::CHUNK_DATA_OFFSET;
        println!(
            "{indent}{}: {} [{}..{}]",
            reader.chunk_id(),
            reader.chunk_size(),
            data_start,
            data_start + reader.chunk_size()
        );

        if reader.can_be_chunk_list() && reader.chunk_size() >= 4 {
            reader.seek_level_sub()?;
            stats.lists += 1;
            println!("{indent}  form: {}", reader.list_form());
            let sub = dump_level(reader, depth + 1)?;
            stats.chunks += sub.chunks;
            stats.lists += sub.lists;
            reader.level_parent()?;
        }

        match reader.seek_next_chunk() {
            Ok(()) => continue,
            Err(RiffError::EndOfChunkList) | Err(RiffError::ExcessData) => return Ok(stats),
            Err(e) => return Err(e.into()),
        }
    }
}
