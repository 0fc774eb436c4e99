use super::constants::*;
use super::location::*;
use super::structure::StructureKind;
use super::terrain::*;

pub trait RoomVisualizer {
    fn render(&mut self, location: Location, structure: StructureKind);
}

/// Renders a plan as an ASCII grid, one character per cell.
///
/// `#` is wall terrain, `~` swamp, blank plain; structures use
/// [`StructureKind::glyph`]. Later renders overwrite earlier ones except that
/// a road never hides a blocking structure.
pub struct TextVisualizer {
    cells: RoomDataArray<char>,
}

impl TextVisualizer {
    pub fn new(terrain: &FastRoomTerrain) -> Self {
        let mut cells = RoomDataArray::new(' ');
        for y in 0..ROOM_HEIGHT {
            for x in 0..ROOM_WIDTH {
                let glyph = match terrain.classify(x, y) {
                    TerrainClass::Wall => '#',
                    TerrainClass::Slow => '~',
                    TerrainClass::Plain => ' ',
                };
                cells.set(x as usize, y as usize, glyph);
            }
        }
        TextVisualizer { cells }
    }

    pub fn glyph_at(&self, location: Location) -> char {
        *self.cells.get(location.x() as usize, location.y() as usize)
    }

    pub fn finish(self) -> String {
        let mut out = String::with_capacity((ROOM_WIDTH as usize + 1) * ROOM_HEIGHT as usize);
        for y in 0..ROOM_HEIGHT as usize {
            for x in 0..ROOM_WIDTH as usize {
                out.push(*self.cells.get(x, y));
            }
            out.push('\n');
        }
        out
    }
}

impl RoomVisualizer for TextVisualizer {
    fn render(&mut self, location: Location, structure: StructureKind) {
        let current = self.glyph_at(location);
        let covers_structure = !matches!(current, ' ' | '#' | '~' | '.');
        if structure == StructureKind::Road && covers_structure {
            return;
        }
        self.cells
            .set(location.x() as usize, location.y() as usize, structure.glyph());
    }
}

#[cfg(feature = "screeps")]
impl RoomVisualizer for screeps::RoomVisual {
    fn render(&mut self, location: Location, structure: StructureKind) {
        let style = screeps::TextStyle::default()
            .color("#ffffff")
            .opacity(0.6);
        self.text(
            location.x() as f32,
            location.y() as f32 + 0.25,
            structure.glyph().to_string(),
            Some(style),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_terrain_and_structures() {
        let terrain = FastRoomTerrain::from_fn(|x, y| {
            if x == 0 {
                TerrainClass::Wall
            } else if y == 0 {
                TerrainClass::Slow
            } else {
                TerrainClass::Plain
            }
        });
        let mut vis = TextVisualizer::new(&terrain);
        let loc = Location::from_xy(5, 5);
        vis.render(loc, StructureKind::Extension);
        vis.render(loc, StructureKind::Road);
        assert_eq!(vis.glyph_at(loc), 'e');

        let text = vis.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 50);
        assert!(lines[1].starts_with('#'));
        assert_eq!(lines[0].chars().nth(3), Some('~'));
        assert_eq!(lines[5].chars().nth(5), Some('e'));
    }
}
