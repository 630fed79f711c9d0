use std::fmt::{Display, Error, Formatter};

#[allow(clippy::while_let_on_iterator)]
pub fn disp_iter<T: Display>(f: &mut Formatter<'_>, iterable: impl IntoIterator<Item = T>, sep: &str) -> Result<(), Error> {
    let mut i = iterable.into_iter();
    if let Some(first) = i.next() {
        write!(f, "{first}")?;
        while let Some(other) = i.next() {
            write!(f, "{sep}")?;
            write!(f, "{other}")?;
        }
    }
    Result::Ok(())
}

/// Lower-cased copy of a PDDL identifier, used wherever names are compared (PDDL is case insensitive).
pub fn canonical(name: &str) -> String {
    name.to_ascii_lowercase()
}
