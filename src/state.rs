use crate::{
    config::AppConfig,
    services::{attachments::AttachmentRegistry, places::PlaceLookup, store::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: TripStore,
    pub attachments: AttachmentRegistry,
    pub places: PlaceLookup,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: TripStore,
        attachments: AttachmentRegistry,
        places: PlaceLookup,
    ) -> Self {
        Self {
            config,
            store,
            attachments,
            places,
        }
    }
}
