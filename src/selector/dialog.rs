use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult};

use crate::selector::{Selection, SelectionError, SelectionKind, Selector};

/// Native dialogs: a File/Folder choice, then the matching chooser.
pub struct DialogSelector {
    source_extension: String,
}

impl DialogSelector {
    pub fn new(source_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
        }
    }
}

impl Selector for DialogSelector {
    fn select(&mut self) -> Result<Option<Selection>, SelectionError> {
        let choice = MessageDialog::new()
            .set_title("Select Option")
            .set_description("Do you want to process a file or a folder?")
            .set_buttons(MessageButtons::OkCancelCustom(
                "File".to_string(),
                "Folder".to_string(),
            ))
            .show();

        let kind = match choice {
            MessageDialogResult::Custom(label) => SelectionKind::parse(&label),
            _ => None,
        };

        let path = match kind {
            Some(SelectionKind::File) => FileDialog::new()
                .set_title("Select a file")
                .add_filter("SDT files", &[self.source_extension.as_str()])
                .pick_file(),
            Some(SelectionKind::Folder) => FileDialog::new()
                .set_title("Select a folder")
                .pick_folder(),
            None => None,
        };

        Ok(kind.zip(path).map(|(kind, path)| kind.with_path(path)))
    }
}
