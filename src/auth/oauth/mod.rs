// Social login providers
// A registry maps provider keys to adapters built per authorization code

pub mod google;
pub mod provider;
pub mod registry;

pub use google::{GoogleAuth, GoogleOAuthConfig};
pub use provider::{SocialAuthProvider, SocialIdentity};
pub use registry::{OAuthRegistry, GOOGLE_AUTH};
