//! Explicit wallet state. The connected signer is an input the workflows
//! receive through [`WalletContext`]; there is no process wide mutable
//! wallet. Connect and disconnect events are observable through a watch
//! subscription.

use derivative::Derivative;
use primitive_types::H160;
use secp256k1::SecretKey;
use tokio::sync::watch;
use web3::signing::{Key as _, SecretKeyRef};

/// A connected signing identity: secret key, the address derived from it
/// and the chain it was connected on.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Wallet {
    // Never printed; the Debug derive skips it.
    #[derivative(Debug = "ignore")]
    key: SecretKey,
    address: H160,
    chain_id: Option<u64>,
}

impl Wallet {
    pub fn new(key: SecretKey, chain_id: Option<u64>) -> Self {
        let address = SecretKeyRef::new(&key).address();
        Self {
            key,
            address,
            chain_id,
        }
    }

    pub fn address(&self) -> H160 {
        self.address
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Signer handle for transaction submission.
    pub fn signer(&self) -> SecretKeyRef<'_> {
        SecretKeyRef::new(&self.key)
    }
}

/// Holds the currently connected wallet, if any. Cheap to share; clones of
/// the subscription observe every connect and disconnect.
pub struct WalletContext {
    sender: watch::Sender<Option<Wallet>>,
    receiver: watch::Receiver<Option<Wallet>>,
}

impl Default for WalletContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletContext {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(None);
        Self { sender, receiver }
    }

    /// Connects a signer, replacing any previous one, and returns its
    /// address.
    pub fn connect(&self, wallet: Wallet) -> H160 {
        let address = wallet.address();
        let _ = self.sender.send(Some(wallet));
        address
    }

    pub fn disconnect(&self) {
        let _ = self.sender.send(None);
    }

    pub fn wallet(&self) -> Option<Wallet> {
        self.receiver.borrow().clone()
    }

    pub fn account(&self) -> Option<H160> {
        self.receiver.borrow().as_ref().map(Wallet::address)
    }

    /// Change events: the receiver yields the new wallet state on every
    /// connect and disconnect. Dropping the receiver is the teardown.
    pub fn subscribe(&self) -> watch::Receiver<Option<Wallet>> {
        self.receiver.clone()
    }
}
