//! Login command - open the broker site to download a fresh activity export

use clap::Args;

pub const LOGIN_URL: &str = "https://my.tastytrade.com/login.html";

#[derive(Args, Debug)]
pub struct LoginCommand {
    /// Print the login URL instead of opening a browser
    #[arg(long)]
    print: bool,
}

impl LoginCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.print {
            println!("{}", LOGIN_URL);
        } else {
            opener::open_browser(LOGIN_URL)?;
            println!("Opened login page in browser: {}", LOGIN_URL);
        }
        Ok(())
    }
}
