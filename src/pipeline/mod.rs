pub mod effects;
pub mod graph;
pub mod playback;
pub mod settings;

#[cfg(test)]
pub mod test_fixture;
