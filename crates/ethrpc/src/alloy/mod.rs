pub mod errors;
mod instrumentation;
pub mod wallet;

use {
    crate::AlloyProvider,
    alloy::{
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
    wallet::SigningKey,
};

/// Provider that fills nonce, gas and chain id of outgoing transactions and
/// signs them with `signer`.
pub fn provider_with_signer(url: &Url, signer: &SigningKey) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: "deployer".into(),
        })
        .http(url.clone());

    ProviderBuilder::new()
        .wallet(signer.wallet())
        .connect_client(rpc)
        .erased()
}

#[cfg(test)]
pub fn mocked_provider(asserter: alloy::providers::mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}
