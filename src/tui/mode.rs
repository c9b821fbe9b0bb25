// state local to the tui, synced from DisplayState once per loop so key
// resolution knows whether a dialog is up
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub dialog_open: bool,
    pub playing: bool,
}
