//! Bitcoin signed-message digest.

use crate::hash::double_sha256;

/// Prefix shared with Bitcoin Core's `signmessage`/`verifymessage`.
pub const MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

/// SHA256d over `varint(len(magic)) || magic || varint(len(message)) || message`.
pub fn signed_message_hash(message: &str) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(1 + MESSAGE_MAGIC.len() + 9 + message.len());
    encode_varint(MESSAGE_MAGIC.len() as u64, &mut preimage);
    preimage.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    encode_varint(message.len() as u64, &mut preimage);
    preimage.extend_from_slice(message.as_bytes());

    let digest = double_sha256(&preimage);
    log::trace!("signed message digest: {}", hex::encode(digest));
    digest
}

/// Encode a variable-length integer (Bitcoin CompactSize).
fn encode_varint(value: u64, output: &mut Vec<u8>) {
    if value < 0xfd {
        output.push(value as u8);
    } else if value <= 0xffff {
        output.push(0xfd);
        output.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffffffff {
        output.push(0xfe);
        output.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        output.push(0xff);
        output.extend_from_slice(&value.to_le_bytes());
    }
}
