/// Application constants

// Grid geometry
pub const GRID_SIZE: u32 = 100;
pub const CANVAS_SIZE: u32 = 1000;
pub const PIECE_SIZE: u32 = CANVAS_SIZE / GRID_SIZE;
pub const TOTAL_PIECES: u32 = GRID_SIZE * GRID_SIZE;

const _: () = assert!(CANVAS_SIZE % GRID_SIZE == 0, "grid must divide the canvas evenly");

// Highlight outline
pub const HIGHLIGHT_COLOR: &str = "#9333ea"; // Solana purple
pub const HIGHLIGHT_LINE_WIDTH: u32 = 2;

// Ledger units
pub const LAMPORTS_PER_SOL: i64 = 1_000_000_000;
pub const SOL_DECIMALS: u32 = 9;
pub const SOLANA_PUBKEY_BYTES: usize = 32;
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.testnet.solana.com";
pub const SOLANA_COMMITMENT: &str = "confirmed";

// Views
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_RECENT_TRANSACTIONS: usize = 10;
pub const MAX_LEDGER_HISTORY_LIMIT: usize = 100;

// Sessions
pub const SESSION_TOKEN_BYTES: usize = 32;

// API version
pub const API_VERSION: &str = "v1";
