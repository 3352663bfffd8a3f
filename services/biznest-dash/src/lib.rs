// services/biznest-dash/src/lib.rs
//
// View layer of the BizNest terminal client. Each view is a headless
// state machine over the shared `BizNest` context; main.rs renders them.
//

pub mod contact;
pub mod dashboard;
pub mod demo;
pub mod detail;
pub mod gate;
pub mod home;
pub mod login;
pub mod profile;

pub use contact::ContactView;
pub use dashboard::{Dashboard, View};
pub use demo::DemoBackend;
pub use detail::DetailView;
pub use gate::AdminGate;
pub use home::HomeView;
pub use login::LoginView;
pub use profile::ProfileView;
