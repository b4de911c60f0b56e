//! State invariants that must hold whenever control returns to the
//! caller, checked across scripted walks, size sweeps and truncated
//! inputs.

mod common;

use common::{chunk, list, riff_file};
use riffpull::{ByteSource, FourCc, MemSource, RiffError, RiffReader, CHUNK_DATA_OFFSET};

fn check_invariants<S: ByteSource>(r: &RiffReader<S>) {
    // Absolute position tracks the chunk-relative one.
    assert_eq!(
        r.position(),
        r.chunk_start() + CHUNK_DATA_OFFSET + r.chunk_pos()
    );
    // The data offset never leaves the chunk.
    assert!(r.chunk_pos() <= r.chunk_size());
    // Pad flag mirrors size parity.
    assert_eq!(r.has_pad(), r.chunk_size() % 2 == 1);
    // The chunk (data + pad) fits inside the enclosing list.
    let pad = u64::from(r.has_pad());
    assert!(
        r.chunk_start() + CHUNK_DATA_OFFSET + r.chunk_size() + pad
            <= r.list_start() + CHUNK_DATA_OFFSET + r.list_size()
    );
    // Every frame fits inside its parent frame.
    for level in (1..=r.level()).rev() {
        let inner = r.frame(level).expect("frame");
        let outer = r.frame(level - 1).expect("parent frame");
        assert!(
            inner.pos_start + CHUNK_DATA_OFFSET + inner.size
                <= outer.pos_start + CHUNK_DATA_OFFSET + outer.size
        );
    }
    // Ids stay printable once validated.
    assert!(r.chunk_id().is_printable());
    assert!(r.list_id().is_printable());
}

fn fixture() -> Vec<u8> {
    riff_file(
        b"AVI ",
        &[
            list(
                b"LIST",
                b"hdrl",
                &[
                    chunk(b"avih", &[7u8; 13]), // odd, padded
                    list(b"LIST", b"strl", &[chunk(b"strh", &[1u8; 6])]),
                ],
            ),
            chunk(b"JUNK", &[0u8; 5]),
            chunk(b"idx1", &[2u8; 16]),
        ],
    )
}

#[test]
fn invariants_hold_across_a_scripted_walk() {
    let file = fixture();
    let mut r = RiffReader::open_mem(&file).expect("open");
    check_invariants(&r);

    r.seek_level_sub().expect("into hdrl");
    check_invariants(&r);

    let mut buf = [0u8; 5];
    r.read_in_chunk(&mut buf).expect("read avih");
    check_invariants(&r);

    r.seek_in_chunk(13).expect("seek to avih end");
    check_invariants(&r);

    r.seek_next_chunk().expect("to inner LIST");
    check_invariants(&r);

    r.seek_level_sub().expect("into strl");
    assert_eq!(r.level(), 2);
    check_invariants(&r);

    r.level_parent().expect("out of strl");
    check_invariants(&r);

    r.seek_level_parent_next().expect("out of hdrl, to JUNK");
    assert_eq!(r.level(), 0);
    assert_eq!(r.chunk_id(), FourCc::from(b"JUNK"));
    check_invariants(&r);

    r.seek_chunk_start().expect("restart JUNK");
    check_invariants(&r);

    r.rewind().expect("rewind");
    assert_eq!(r.level(), 0);
    check_invariants(&r);
}

#[test]
fn count_matches_a_manual_walk() {
    let file = fixture();
    let mut r = RiffReader::open_mem(&file).expect("open");

    r.seek_level_start().expect("start");
    let mut manual = 1u64;
    loop {
        match r.seek_next_chunk() {
            Ok(()) => manual += 1,
            Err(RiffError::EndOfChunkList) | Err(RiffError::ExcessData) => break,
            Err(e) => panic!("walk failed: {e}"),
        }
    }
    assert_eq!(r.count_chunks_in_level().expect("count"), manual);
}

#[test]
fn pad_parity_over_a_size_sweep() {
    for size in 0usize..8 {
        let data = vec![0xA5u8; size];
        let file = riff_file(
            b"test",
            &[chunk(b"var ", &data), chunk(b"tail", &[1, 2])],
        );
        let mut r = RiffReader::open_mem(&file).expect("open");
        assert_eq!(r.chunk_size(), size as u64);
        assert_eq!(r.has_pad(), size % 2 == 1);
        check_invariants(&r);

        // The pad byte never leaks into reads and never breaks the
        // walk to the sibling.
        let mut buf = vec![0u8; size + 2];
        assert_eq!(r.read_in_chunk(&mut buf).expect("read"), size);
        r.seek_next_chunk().expect("next");
        assert_eq!(r.chunk_id(), FourCc::from(b"tail"));
        check_invariants(&r);
    }
}

#[test]
fn truncated_inputs_fail_cleanly() {
    let file = fixture();
    // Every proper prefix must either open with consistent state or
    // fail with a critical error; never panic.
    for cut in 0..file.len() {
        let prefix = &file[..cut];
        match RiffReader::open_custom(MemSource::new(prefix), prefix.len() as u64) {
            Ok(mut r) => {
                r.silence();
                check_invariants(&r);
                if let Err(e) = r.file_validate() {
                    assert!(e.is_critical(), "unexpected non-critical failure: {e}");
                }
            }
            Err(e) => {
                assert!(e.is_critical(), "open failed non-critically at cut {cut}: {e}");
            }
        }
    }
}
