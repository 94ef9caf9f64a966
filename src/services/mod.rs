// All service modules
pub mod debounce;
pub mod leaderboard;
pub mod wallet_gate;

// Re-export for convenience
pub use debounce::Debouncer;
pub use wallet_gate::WalletGate;
