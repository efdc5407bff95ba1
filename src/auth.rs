use rocket::http::{CookieJar, Status};
use rocket::request::{FromRequest, Outcome, Request};

const ADMIN_COOKIE: &str = "admin_session";

/// Request guard for routes only a logged-in admin may use.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Admin {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.cookies().get_private(ADMIN_COOKIE) {
            Some(_) => Outcome::Success(Admin),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

pub fn log_in(cookies: &CookieJar<'_>) {
    cookies.add_private((ADMIN_COOKIE, "1"));
}

pub fn log_out(cookies: &CookieJar<'_>) {
    cookies.remove_private(ADMIN_COOKIE);
}

/// Timing does not depend on where the first mismatch is.
#[must_use]
pub fn password_matches(given: &str, expected: &str) -> bool {
    constant_time_eq::constant_time_eq(given.as_bytes(), expected.as_bytes())
}
