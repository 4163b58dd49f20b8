use std::sync::Arc;

use serde_json::Value;

use crate::portal::accounts::service::AccountService;
use crate::portal::infra::{
    DigestPasswordHasher, InMemoryAccountRepository, InMemoryTokenAuthority, RecordingOtpMailer,
    SequenceCodeSource,
};

pub(super) struct Fixture {
    pub service: Arc<AccountService<InMemoryAccountRepository, RecordingOtpMailer>>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub mailer: Arc<RecordingOtpMailer>,
}

pub(super) fn fixture() -> Fixture {
    let repository = Arc::new(InMemoryAccountRepository::default());
    let mailer = Arc::new(RecordingOtpMailer::default());
    let service = Arc::new(AccountService::new(
        repository.clone(),
        mailer.clone(),
        Arc::new(SequenceCodeSource::default()),
        Arc::new(DigestPasswordHasher),
        Arc::new(InMemoryTokenAuthority::default()),
    ));
    Fixture {
        service,
        repository,
        mailer,
    }
}

/// Run send + verify for `email`, returning the verified account id.
pub(super) fn verified_account(fx: &Fixture, email: &str) -> crate::portal::accounts::AccountId {
    fx.service.send_otp(email).expect("otp dispatches");
    let code = fx.mailer.last_code_for(email).expect("code recorded");
    fx.service
        .verify_otp(email, &code)
        .expect("otp verifies")
        .id
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
