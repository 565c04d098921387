pub(crate) const APP_TITLE: &str = "SFTP FILE UPLOADER 0.1.0";
pub(crate) const HELP_TEXT: &str =
    "Tab/Up/Down to move | Enter to select | F1 to cycle view | Ctrl+C to quit";

pub(crate) const LABEL_WIDTH: usize = 11;

pub(crate) const HEADER_HEIGHT: u16 = 3;
pub(crate) const LOGS_HEADER_HEIGHT: u16 = 8;
pub(crate) const FOOTER_HEIGHT: u16 = 4;

pub(crate) const PICKER_WIDTH: u16 = 60;
pub(crate) const PICKER_HEIGHT: u16 = 90;
pub(crate) const PICKER_FOOTER_HEIGHT: u16 = 2;

pub(crate) const POPUP_MIN_WIDTH: u16 = 10;
pub(crate) const POPUP_MIN_HEIGHT: u16 = 5;
