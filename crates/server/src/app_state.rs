use crate::country::WorldBankClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) world_bank: WorldBankClient,
}
