// Business logic services layer
//
// Import, dispatch and export are plain async functions over a pool so the
// CLI (or any other front end) can call them as black boxes.

pub mod dispatch;
pub mod export;
pub mod import;
