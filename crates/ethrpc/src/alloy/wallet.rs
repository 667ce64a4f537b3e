use {
    crate::Error,
    alloy::{
        network::EthereumWallet,
        primitives::Address,
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    std::{fmt, str::FromStr},
};

/// Mnemonic of the pre-funded accounts of Hardhat and Anvil development
/// nodes.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Private key of the account that signs and pays for deployments. The key
/// material never shows up in `Debug` output, only the account address.
#[derive(Clone)]
pub struct SigningKey(PrivateKeySigner);

impl SigningKey {
    /// One of the pre-funded development accounts derived from
    /// [`DEV_MNEMONIC`].
    pub fn dev_account(index: u32) -> Result<Self, Error> {
        MnemonicBuilder::<English>::default()
            .phrase(DEV_MNEMONIC)
            .index(index)
            .map_err(|_| Error::InvalidSigningKey)?
            .build()
            .map(Self)
            .map_err(|_| Error::InvalidSigningKey)
    }

    pub fn address(&self) -> Address {
        self.0.address()
    }

    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.0.clone())
    }
}

impl FromStr for SigningKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Not including the parse error, it could echo parts of the key.
        PrivateKeySigner::from_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidSigningKey)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&self.address()).finish()
    }
}
