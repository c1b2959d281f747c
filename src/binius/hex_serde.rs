//! Serde helpers that hex-encode digests for human-readable transports.
//!
//! Binary encoders (bincode) see raw digest arrays; text encoders
//! (serde_json) see lowercase hex strings.

pub mod digest {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

    use crate::binius::merkle::MerkleDigest;

    pub fn serialize<S: Serializer>(data: &MerkleDigest, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(data))
        } else {
            data.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MerkleDigest, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            let bytes = hex::decode(&text).map_err(D::Error::custom)?;
            bytes
                .try_into()
                .map_err(|_| D::Error::custom("digest must be 32 bytes"))
        } else {
            MerkleDigest::deserialize(deserializer)
        }
    }
}

pub mod digest_paths {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

    use crate::binius::merkle::MerkleDigest;

    pub fn serialize<S: Serializer>(
        data: &Vec<Vec<MerkleDigest>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            let encoded: Vec<Vec<String>> = data
                .iter()
                .map(|path| path.iter().map(hex::encode).collect())
                .collect();
            encoded.serialize(serializer)
        } else {
            data.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<MerkleDigest>>, D::Error> {
        if deserializer.is_human_readable() {
            let encoded: Vec<Vec<String>> = Vec::deserialize(deserializer)?;
            encoded
                .into_iter()
                .map(|path| {
                    path.into_iter()
                        .map(|text| {
                            let bytes = hex::decode(&text).map_err(D::Error::custom)?;
                            bytes
                                .try_into()
                                .map_err(|_| D::Error::custom("digest must be 32 bytes"))
                        })
                        .collect()
                })
                .collect()
        } else {
            Vec::deserialize(deserializer)
        }
    }
}
