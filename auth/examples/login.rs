use auth::{AuthClient, Authenticator, InMemoryUserStore, UserStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let mut rng = StdRng::seed_from_u64(7);
    let service = Authenticator::new(InMemoryUserStore::new());
    let mut client = AuthClient::new(&service);

    let registered = client
        .register(&mut rng, "alice", "hunter2")
        .expect("keygen");
    println!("register: {}", registered.message());

    let outcome = client.login(&mut rng, "alice").expect("login");
    println!("login: {}", outcome.message());

    let token = client.session_token().expect("session").to_string();
    println!("session valid: {}", service.is_valid_session(&token));
    println!("session owner: {:?}", service.username_of(&token));

    for user in service.users().list_users() {
        println!("{} last login {:?}", user.username, user.last_login_at);
    }

    client.logout();
    println!("session valid after logout: {}", service.is_valid_session(&token));
}
