use super::Context;
use docreview_core::error::DocReviewError;
use docreview_core::store::Repository;

pub fn login(ctx: &Context, email: &str) -> Result<(), DocReviewError> {
    let mut repo = ctx.repo();
    let user = docreview_core::login(&mut repo, email)?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), DocReviewError> {
    let mut repo = ctx.repo();
    docreview_core::logout(&mut repo)?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<(), DocReviewError> {
    match ctx.repo().current_user()? {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.id),
        None => println!("Not logged in"),
    }
    Ok(())
}
