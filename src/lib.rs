// Walkable gallery engine: the exploration core shared by the host binary
// and the integration tests.

pub mod engine;
