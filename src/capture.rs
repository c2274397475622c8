//! Input-side glue: opening the capture stream and filling raw buffers.
//!
//! Reads are blocking and must return exactly the requested byte count.
//! Anything short of a full buffer, including a clean EOF, is an
//! underrun the caller treats as fatal; there is no retry and no
//! partial-buffer recovery.

use std::fs::File;
use std::io::{self, Read};

/// Open the capture stream; `-` selects standard input.
pub fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn short_reads_surface_as_unexpected_eof() {
        let mut input = Cursor::new(vec![0u8; 3]);
        let mut buf = [0u8; 8];
        let err = input.read_exact(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn missing_input_files_fail_to_open() {
        assert!(open_input("/nonexistent/capture.dat").is_err());
    }
}
