use serde::Serialize;

/// Success envelope: every endpoint except `/health` answers `{ "data": T }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
