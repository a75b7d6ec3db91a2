use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    msg_print!(Message::SoundCatalogHeader, true);
    View::sounds();
    Ok(())
}
