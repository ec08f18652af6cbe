use super::Mutation;
use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::note::{self, Note};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct AddNote {
    pub text: String,
}

impl Mutation for AddNote {
    type Output = Note;

    fn apply(self, data: &mut Snapshot) -> Result<(Note, Vec<Change>)> {
        let note = Note::new(&self.text)?;
        data.notes.push(note.clone());
        Ok((note.clone(), vec![Change::PutNote { note }]))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub id: String,
    pub text: String,
}

impl Mutation for UpdateNote {
    type Output = Note;

    fn apply(self, data: &mut Snapshot) -> Result<(Note, Vec<Change>)> {
        let text = note::clean_text(&self.text)?;
        let n = data.note_mut(&self.id)?;
        n.text = text;
        Ok((n.clone(), vec![Change::PutNote { note: n.clone() }]))
    }
}

#[derive(Debug, Clone)]
pub struct RemoveNote {
    pub id: String,
}

impl Mutation for RemoveNote {
    type Output = Note;

    fn apply(self, data: &mut Snapshot) -> Result<(Note, Vec<Change>)> {
        let pos = data
            .notes
            .iter()
            .position(|n| n.id == self.id)
            .ok_or_else(|| JourneyError::NoteNotFound(self.id.clone()))?;
        let removed = data.notes.remove(pos);
        Ok((removed, vec![Change::DeleteNote { id: self.id }]))
    }
}
