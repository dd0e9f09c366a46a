pub mod eip712;
pub mod secp256k1;

pub use self::eip712::{Eip712Auth, Eip712Factory};
pub use self::secp256k1::{Secp256k1Auth, Secp256k1Factory};
