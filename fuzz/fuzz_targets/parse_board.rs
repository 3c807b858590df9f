#![no_main]
use hexen::hex::board::Board;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = Board::from_rows(s) {
            // Printing the board back has to produce the same board.
            assert_eq!(Board::from_rows(&board.rows()).ok(), Some(board));
        }
    }
});
