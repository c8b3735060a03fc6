//! Builds a motion list for the LaPD XY plane and walks the result the way
//! a hardware consumer would.

use motionlist::{ItemConfig, MotionList, MotionSpace};

fn main() -> motionlist::Result<()> {
    let mut list = MotionList::new(MotionSpace::preset("lapd_xy")?);

    // A coarse survey grid over the accessible plane.
    list.add_layer(
        &ItemConfig::new("grid")
            .with("limits", serde_json::json!([[-40.0, 40.0], [-40.0, 40.0]]))
            .with("steps", 9),
    )?;

    // Machine enclosure plus the probe cone from the east port.
    list.add_exclusion(&ItemConfig::new("lapd"))?;

    let points = list.points()?.to_vec();
    println!(
        "visiting {} of {} candidate positions:",
        points.len(),
        9 * 9
    );
    for point in &points {
        // A real consumer would call its hardware's move_to() here.
        println!("  ({:7.2}, {:7.2})", point[0], point[1]);
    }

    // The exported config is everything needed to rebuild this list.
    let config = list.config()?;
    println!("\nconfig:\n{}", serde_json::to_string_pretty(&config).expect("config serializes"));
    Ok(())
}
