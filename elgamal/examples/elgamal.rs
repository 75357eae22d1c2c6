use elgamal::{Encoding, KeyPair, PublicKey, SerializedPublicKey, Signature};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let kp = KeyPair::generate(&mut rng, 512).expect("keygen");
    println!("{}", kp.public_key());
    println!("{:?}", kp.private_key());

    let exported = SerializedPublicKey::export(kp.public_key(), Encoding::Base64);
    let json = exported.to_json().expect("export");
    println!("{json}");

    let msg = b"hello elgamal";
    let sig = kp.sign(&mut rng, msg).expect("sign");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");

    let pk: PublicKey = SerializedPublicKey::from_json(&json)
        .and_then(|s| s.import(Encoding::Base64))
        .expect("import");
    let sig2: Signature = bincode::deserialize(&sig_bytes).expect("deserialize sig");

    let ok = pk.verify(msg, &sig2);
    assert!(ok);
    println!("signature verified: {ok}");
}
