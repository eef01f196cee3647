//! Human-readable summaries of an object and its adjacent links.

use quiver_types::ObjectId;

use crate::error::WorldResult;
use crate::world::World;

/// Numbered listing of an object and its neighbourhood.
///
/// Incoming links come first, each shown with its name and its domain.
/// After the object's own line come the outgoing links, each shown with
/// its codomain. One counter (in hex) runs across both lists:
///
/// ```text
///      0    knows | Alice
/// ["Bob" (00000002): likes tea]
///      1  manages | Carol
/// ```
pub fn render(world: &World, id: ObjectId) -> WorldResult<String> {
    let obj = world.lookup(id)?;
    let mut out = String::new();
    let mut counter = 0usize;

    for link in obj.incoming() {
        let link = world.lookup(*link)?;
        let other = endpoint_name(world, link.domain())?;
        push_row(&mut out, &mut counter, link.name(), other);
    }

    out.push_str(&heading(obj.name(), obj.id(), obj.notes()));
    if let Some(m) = obj.morphism() {
        out.push_str(&format!(
            " {} -> {}",
            world.lookup(m.domain)?.name(),
            world.lookup(m.codomain)?.name()
        ));
    }
    out.push('\n');

    for link in obj.outgoing() {
        let link = world.lookup(*link)?;
        let other = endpoint_name(world, link.codomain())?;
        push_row(&mut out, &mut counter, link.name(), other);
    }
    Ok(out)
}

/// Terse dump of an object: its own line, its endpoints if it is a link,
/// then one line per incoming (`->`) and outgoing (`<-`) link name.
/// No trailing newline.
pub fn render_raw(world: &World, id: ObjectId) -> WorldResult<String> {
    let obj = world.lookup(id)?;
    let mut out = heading(obj.name(), obj.id(), obj.notes());

    if let Some(m) = obj.morphism() {
        out.push_str(&format!(
            "\n\t{} -> {}",
            world.lookup(m.domain)?.name(),
            world.lookup(m.codomain)?.name()
        ));
    }
    for link in obj.incoming() {
        out.push_str("\n\t-> ");
        out.push_str(world.lookup(*link)?.name());
    }
    for link in obj.outgoing() {
        out.push_str("\n\t<- ");
        out.push_str(world.lookup(*link)?.name());
    }
    Ok(out)
}

fn heading(name: &str, id: ObjectId, notes: &str) -> String {
    format!("[\"{name}\" ({id}): {notes}]")
}

fn endpoint_name(world: &World, endpoint: Option<ObjectId>) -> WorldResult<&str> {
    match endpoint {
        Some(id) => Ok(world.lookup(id)?.name()),
        None => Ok(""),
    }
}

fn push_row(out: &mut String, counter: &mut usize, link_name: &str, other: &str) {
    out.push_str(&format!("   {:>3x} {:>8.8} | {}\n", *counter, link_name, other));
    *counter += 1;
}
