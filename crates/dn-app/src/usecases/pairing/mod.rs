mod pair_device;
mod pairing_loop;

pub use pair_device::{PairAttemptError, PairDevice, PairDeviceDeps};
pub use pairing_loop::AttemptPairingLoop;
