// src/checker/contact.rs
// mailto: and tel: links. No network involved, only a sanity check of the
// address part.

use super::Checker;
use crate::htmldoc::Reference;
use crate::issues::Level;
use std::sync::Arc;

impl Checker {
    pub(super) fn check_mailto(&self, reference: &Arc<Reference>) {
        if !self.options.check_mailto {
            return;
        }
        let address = reference.opaque();
        if address.is_empty() {
            self.report(Level::Error, "mailto is empty", reference);
        } else if !address.contains('@') {
            self.report(Level::Error, "contains an invalid email address", reference);
        }
    }

    pub(super) fn check_tel(&self, reference: &Arc<Reference>) {
        if !self.options.check_tel {
            return;
        }
        if reference.opaque().is_empty() {
            self.report(Level::Error, "tel is empty", reference);
        }
    }
}
