//! The autotiler orchestrator
//!
//! [`Autotiler`] walks a region of an [`Outline`] cell by cell and decides
//! which tile images to place where. Placement runs as a fixed sequence of
//! passes per cell (null, land, water, road, molten, cliffs); multi-cell
//! features (waterfalls, stairs) are collected as collision events during
//! the pass and resolved over their merged rectangles afterwards.
//!
//! Each map is deterministic: the RNG stream is derived from the configured
//! seed and the region's corner coordinates, and is consumed in a fixed
//! order, only for tile-variant choice.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::catalog::{first_full, first_transition, GroundTiles};
use crate::cell::{within_radius, Cell, Neighborhood};
use crate::collision::{CollisionKind, CollisionMap, CollisionRegion};
use crate::config::AutotilerConfig;
use crate::error::{AutotileError, Result};
use crate::event::{presets, Event};
use crate::heading::Heading;
use crate::outline::{tags, Outline};
use crate::rect::Rect;
use crate::sink::{MapBuffer, TileSink};

/// Places tiles onto maps based on an outline's terrain description.
///
/// Construct once per configuration and reuse across maps; all rendering
/// methods take `&self` and are safe to call from parallel workers.
pub struct Autotiler {
    cfg: AutotilerConfig,
    observer: Option<SyncSender<Event>>,
}

impl Autotiler {
    /// Create an autotiler, validating the configuration
    pub fn new(cfg: AutotilerConfig) -> Result<Self> {
        if cfg.workers == 0 {
            return Err(AutotileError::InvalidConfig(
                "workers must be >= 1".to_string(),
            ));
        }
        if cfg.beach_width < 0 {
            return Err(AutotileError::InvalidConfig(
                "beach width must be >= 0".to_string(),
            ));
        }
        if cfg.vegetation_min_temp >= cfg.vegetation_max_temp {
            return Err(AutotileError::InvalidConfig(
                "vegetation max temp must be greater than min temp".to_string(),
            ));
        }
        Ok(Self {
            cfg,
            observer: None,
        })
    }

    /// The configuration this autotiler was built with
    pub fn config(&self) -> &AutotilerConfig {
        &self.cfg
    }

    /// Watch placements as they are decided.
    ///
    /// The channel is a rendezvous: there is no internal buffering, and
    /// while a receiver exists every placement blocks until it is consumed.
    /// Dropping the receiver turns emission back into a no-op.
    pub fn observe(&mut self) -> Receiver<Event> {
        let (tx, rx) = sync_channel(0);
        self.observer = Some(tx);
        rx
    }

    /// Tile the inclusive `region` of `outline` into `sink`.
    ///
    /// Cells are visited in scan order (rows top to bottom, left to right).
    /// A terrain-source error aborts the map part way through.
    pub fn render_map<O, S>(&self, outline: &O, region: Rect, sink: &mut S) -> Result<()>
    where
        O: Outline + ?Sized,
        S: TileSink + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(map_seed(self.cfg.seed, region));
        self.render_with(outline, region, sink, &mut rng)
    }

    /// Tile several independent regions in parallel, one [`MapBuffer`] each.
    ///
    /// Runs on a fixed-size worker pool (`workers` in the configuration).
    /// Results match sequential [`render_map`](Self::render_map) calls
    /// exactly; each map owns its own RNG stream and collision state. The
    /// first error fails the whole batch.
    pub fn render_maps<O>(&self, outline: &O, regions: &[Rect]) -> Result<Vec<MapBuffer>>
    where
        O: Outline + Sync + ?Sized,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.workers)
            .build()
            .map_err(|e| AutotileError::WorkerPool(e.to_string()))?;

        pool.install(|| {
            regions
                .par_iter()
                .map(|&region| {
                    let mut buf = MapBuffer::new();
                    self.render_map(outline, region, &mut buf)?;
                    Ok(buf)
                })
                .collect()
        })
    }

    /// The semantic ground tags at a cell, without placing anything.
    ///
    /// Reports the highest-priority terrain tag (null, then cliffs, water,
    /// molten, road, land) followed by none-or-more pass-through tags from
    /// the terrain source.
    pub fn tags_at<O>(&self, outline: &O, x: i32, y: i32) -> Result<Vec<String>>
    where
        O: Outline + ?Sized,
    {
        let cell = outline.at(x, y)?;
        let hood = Neighborhood::sample(outline, cell.pos)?;
        // variant choice never affects the tag, so any fixed seed will do
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut tag = self.place_null(&cell, true).1;
        if tag.is_none() {
            tag = self.place_cliffs(outline, &mut rng, &cell, &hood, true)?.1;
        }
        if tag.is_none() {
            tag = self.place_water(&mut rng, &cell, &hood, true).1;
        }
        if tag.is_none() {
            tag = self.place_molten(&mut rng, &cell, &hood, true).1;
        }
        if tag.is_none() {
            tag = self.place_road(&mut rng, &cell, &hood, true).1;
        }
        if tag.is_none() {
            tag = self.place_land(outline, &mut rng, &cell, true)?.1;
        }

        let mut out = cell.tags.clone();
        out.push(tag.unwrap_or(tags::NULL).to_string());
        Ok(out)
    }

    fn render_with<O, S>(
        &self,
        outline: &O,
        region: Rect,
        sink: &mut S,
        rng: &mut ChaCha8Rng,
    ) -> Result<()>
    where
        O: Outline + ?Sized,
        S: TileSink + ?Sized,
    {
        log::debug!("rendering map over {:?}", region);
        let mut collisions = CollisionMap::new();

        for y in region.min.y..=region.max.y {
            for x in region.min.x..=region.max.x {
                let cell = outline.at(x, y)?;

                let mut events = self.place_null(&cell, false).0;
                if !cell.null {
                    let hood = Neighborhood::sample(outline, cell.pos)?;
                    events.extend(self.place_land(outline, rng, &cell, false)?.0);
                    events.extend(self.place_water(rng, &cell, &hood, false).0);
                    events.extend(self.place_road(rng, &cell, &hood, false).0);
                    events.extend(self.place_molten(rng, &cell, &hood, false).0);
                    events.extend(self.place_cliffs(outline, rng, &cell, &hood, false)?.0);
                }

                for e in events {
                    self.enact(e, region, &mut collisions, sink);
                }
            }
        }

        let mut resolved = Vec::new();
        for r in collisions.regions() {
            resolved.extend(self.resolve_collision(outline, rng, r)?);
        }
        for e in resolved {
            self.enact(e, region, &mut collisions, sink);
        }

        Ok(())
    }

    /// Apply one event: route collisions to the aggregator, drop empty or
    /// out-of-region events, write the rest to the sink and broadcast.
    fn enact<S>(&self, event: Event, region: Rect, collisions: &mut CollisionMap, sink: &mut S)
    where
        S: TileSink + ?Sized,
    {
        if event.collision.is_some() {
            collisions.push(event);
            return;
        }
        if event.src.is_empty() && event.object_id.is_none() {
            return;
        }
        if !region.contains(event.pos) {
            return;
        }

        match event.object_id.as_deref() {
            Some(id) => sink.place_object(event.pos.x, event.pos.y, event.z, id),
            None => sink.set_tile(event.pos.x, event.pos.y, event.z, &event.src, &event.properties),
        }

        if let Some(observer) = &self.observer {
            // rendezvous send; a dropped receiver means no one is listening
            let _ = observer.send(event);
        }
    }

    fn place_null(&self, cell: &Cell, tags_only: bool) -> (Vec<Event>, Option<&'static str>) {
        if !cell.null {
            return (Vec::new(), None);
        }
        if tags_only {
            return (Vec::new(), Some(tags::NULL));
        }

        let mut events = Vec::new();
        if let Some(src) = &cell.catalog.null {
            events.push(Event::tile(cell.pos, self.cfg.z_land, src, presets::null()));
        }
        (events, Some(tags::NULL))
    }

    /// Ground tiles always go down (even under water); the ground type is
    /// decided by temperature, height and distance to water, each falling
    /// back along a chain of alternatives when the catalog lacks the
    /// preferred type.
    fn place_land<O>(
        &self,
        outline: &O,
        rng: &mut ChaCha8Rng,
        cell: &Cell,
        tags_only: bool,
    ) -> Result<(Vec<Event>, Option<&'static str>)>
    where
        O: Outline + ?Sized,
    {
        if cell.null {
            return Ok((Vec::new(), None));
        }
        let cat = &*cell.catalog;
        let tsn = self.cfg.transition_width;

        let beach = self.cfg.beach_width;
        let mut near_water = false;
        let mut near_water_fringe = false;
        if beach > 0 && cell.height < self.cfg.cliff_level {
            near_water = !within_radius(outline, cell.pos, beach, |c| c.water)?.is_empty();
            near_water_fringe =
                !within_radius(outline, cell.pos, beach + 1, |c| c.water)?.is_empty();
        }

        let (tag, chain): (&'static str, [Option<&GroundTiles>; 3]) =
            if cell.temperature <= self.cfg.snow_level - tsn {
                (
                    tags::SNOW,
                    [cat.snow.as_ref(), cat.dirt.as_ref(), cat.rock.as_ref()],
                )
            } else if near_water {
                (tags::SAND, [cat.sand.as_ref(), cat.rock.as_ref(), None])
            } else if cell.height >= self.cfg.mountain_level + tsn {
                (tags::ROCK, [cat.rock.as_ref(), cat.dirt.as_ref(), None])
            } else if cell.temperature <= self.cfg.vegetation_min_temp - tsn {
                (tags::DIRT, [cat.dirt.as_ref(), cat.rock.as_ref(), None])
            } else if cell.temperature >= self.cfg.vegetation_max_temp + tsn {
                // desert
                (
                    tags::SAND,
                    [cat.sand.as_ref(), cat.rock.as_ref(), cat.dirt.as_ref()],
                )
            } else {
                (
                    tags::GRASS,
                    [cat.grass.as_ref(), cat.dirt.as_ref(), cat.rock.as_ref()],
                )
            };
        if tags_only {
            return Ok((Vec::new(), Some(tag)));
        }

        let mut events = Vec::new();
        if let Some(src) = first_full(rng, &chain) {
            events.push(Event::tile(cell.pos, self.cfg.z_land, src, presets::land()));
        }

        // partial-cover tile softening the approach to a boundary
        let transition = if cell.temperature <= self.cfg.snow_level {
            first_transition(
                rng,
                &[cat.snow.as_ref(), cat.dirt.as_ref(), cat.rock.as_ref()],
            )
        } else if near_water_fringe && !near_water {
            first_transition(rng, &[cat.sand.as_ref(), cat.dirt.as_ref()])
        } else if cell.temperature >= self.cfg.vegetation_max_temp {
            first_transition(
                rng,
                &[cat.sand.as_ref(), cat.rock.as_ref(), cat.dirt.as_ref()],
            )
        } else if cell.temperature <= self.cfg.vegetation_min_temp {
            first_transition(rng, &[cat.dirt.as_ref(), cat.rock.as_ref()])
        } else if cell.height >= self.cfg.mountain_level {
            first_transition(rng, &[cat.rock.as_ref(), cat.dirt.as_ref()])
        } else {
            None
        };
        if let Some(src) = transition {
            events.push(Event::tile(
                cell.pos,
                self.cfg.z_land + 1,
                src,
                presets::land(),
            ));
        }

        Ok((events, Some(tag)))
    }

    fn place_water(
        &self,
        rng: &mut ChaCha8Rng,
        cell: &Cell,
        hood: &Neighborhood,
        tags_only: bool,
    ) -> (Vec<Event>, Option<&'static str>) {
        if cell.null || !cell.water {
            return (Vec::new(), None);
        }
        let Some(water) = &cell.catalog.water else {
            return (Vec::new(), None);
        };
        if tags_only {
            return (Vec::new(), Some(tags::WATER));
        }

        let mut events = Vec::new();
        if let Some(src) = water.choose_piece(rng, hood, |c| c.water) {
            events.push(Event::tile(
                cell.pos,
                self.cfg.z_water,
                src,
                presets::water(),
            ));
        }

        // a road crossing water gets bridge pieces over the water layer
        if cell.road {
            if let Some(bridge) = &cell.catalog.bridge {
                if let Some(src) = bridge.choose_piece(rng, hood, |c| c.road && c.water) {
                    events.push(Event::tile(
                        cell.pos,
                        self.cfg.z_road,
                        src,
                        presets::road(),
                    ));
                }
            }
        }

        (events, Some(tags::WATER))
    }

    fn place_road(
        &self,
        rng: &mut ChaCha8Rng,
        cell: &Cell,
        hood: &Neighborhood,
        tags_only: bool,
    ) -> (Vec<Event>, Option<&'static str>) {
        if cell.null || !cell.road {
            return (Vec::new(), None);
        }
        let tileset = if cell.water {
            cell.catalog.bridge.as_ref()
        } else {
            cell.catalog.road.as_ref()
        };
        let Some(tileset) = tileset else {
            return (Vec::new(), None);
        };
        if tags_only {
            return (Vec::new(), Some(tags::ROAD));
        }

        let mut events = Vec::new();
        if let Some(src) = tileset.choose_piece(rng, hood, |c| c.road) {
            events.push(Event::tile(cell.pos, self.cfg.z_road, src, presets::road()));
        }
        (events, Some(tags::ROAD))
    }

    fn place_molten(
        &self,
        rng: &mut ChaCha8Rng,
        cell: &Cell,
        hood: &Neighborhood,
        tags_only: bool,
    ) -> (Vec<Event>, Option<&'static str>) {
        if cell.null || !cell.molten || cell.water {
            return (Vec::new(), None);
        }
        let Some(lava) = &cell.catalog.lava else {
            return (Vec::new(), None);
        };
        if tags_only {
            return (Vec::new(), Some(tags::LAVA));
        }

        let mut events = Vec::new();
        if let Some(src) = lava.choose_piece(rng, hood, |c| c.molten && !c.water) {
            events.push(Event::tile(
                cell.pos,
                self.cfg.z_water,
                src,
                presets::lava(),
            ));
        }
        (events, Some(tags::LAVA))
    }

    fn place_cliffs<O>(
        &self,
        outline: &O,
        rng: &mut ChaCha8Rng,
        cell: &Cell,
        hood: &Neighborhood,
        tags_only: bool,
    ) -> Result<(Vec<Event>, Option<&'static str>)>
    where
        O: Outline + ?Sized,
    {
        if cell.null || cell.height < self.cfg.cliff_level {
            return Ok((Vec::new(), None));
        }
        let Some(cliff) = &cell.catalog.cliff else {
            return Ok((Vec::new(), None));
        };

        let lowland = hood.lower(cell.height);
        let placements = cliff.placements(rng, cell.pos, &lowland);
        if placements.is_empty() {
            // high ground directly behind a cliff face still reads as edge
            if tags_only && self.south_is_cliff_face(outline, cell)? {
                return Ok((Vec::new(), Some(tags::CLIFF_EDGE)));
            }
            return Ok((Vec::new(), None));
        }
        if tags_only {
            return Ok((Vec::new(), Some(tags::CLIFF_FACE)));
        }

        let mut events: Vec<Event> = placements
            .into_iter()
            .map(|p| Event::tile(p.pos, self.cfg.z_cliff, p.src, presets::cliff()))
            .collect();

        if let Some(kind) = self.crossing_kind(cell, hood) {
            events.push(Event::collision(cell.pos, self.cfg.z_cliff, kind));
        }

        Ok((events, Some(tags::CLIFF_FACE)))
    }

    /// Whether water or road crossing this cliff cell forms a waterfall or
    /// staircase, and in which flow direction.
    ///
    /// Requires at least 5 of the 8 neighbors to share the feature, plus an
    /// opposing cardinal pair sharing it whose heights straddle the target
    /// (one at-or-above, the other at-or-below, and unequal). Corners never
    /// qualify.
    fn crossing_kind(&self, cell: &Cell, hood: &Neighborhood) -> Option<CollisionKind> {
        let h = cell.height;
        let n = hood.get(Heading::North);
        let s = hood.get(Heading::South);
        let e = hood.get(Heading::East);
        let w = hood.get(Heading::West);

        if cell.water {
            if hood.count(|c| c.water) < 5 {
                return None;
            }
            let ns = n.water && s.water && n.height != s.height;
            let ew = e.water && w.water && e.height != w.height;

            if ns && n.height >= h && s.height <= h {
                Some(CollisionKind::WaterfallNorthSouth)
            } else if ns && n.height <= h && s.height >= h {
                Some(CollisionKind::WaterfallSouthNorth)
            } else if ew && e.height >= h && w.height <= h {
                Some(CollisionKind::WaterfallEastWest)
            } else if ew && e.height <= h && w.height >= h {
                Some(CollisionKind::WaterfallWestEast)
            } else {
                None
            }
        } else if cell.road {
            if hood.count(|c| c.road) < 5 {
                return None;
            }
            let ns = n.road && s.road && n.height != s.height;
            let ew = e.road && w.road && e.height != w.height;

            if ns && n.height >= h && s.height <= h {
                Some(CollisionKind::StairsNorthSouth)
            } else if ns && n.height <= h && s.height >= h {
                Some(CollisionKind::StairsSouthNorth)
            } else if ew && e.height >= h && w.height <= h {
                Some(CollisionKind::StairsEastWest)
            } else if ew && e.height <= h && w.height >= h {
                Some(CollisionKind::StairsWestEast)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Lazy check for the cliff-edge tag: the cell directly south is itself
    /// a cliff face at or below our height.
    fn south_is_cliff_face<O>(&self, outline: &O, cell: &Cell) -> Result<bool>
    where
        O: Outline + ?Sized,
    {
        let below = outline.at(cell.pos.x, cell.pos.y + 1)?;
        if below.height < self.cfg.cliff_level || below.height > cell.height {
            return Ok(false);
        }
        let hood = Neighborhood::sample(outline, below.pos)?;
        Ok(!hood.lower(below.height).is_empty())
    }

    /// Turn a merged collision region into waterfall or staircase fills.
    ///
    /// The fill rectangle is adjusted per kind to cover the feature's full
    /// visual footprint. A catalog without the matching tiles drops the
    /// region silently.
    fn resolve_collision<O>(
        &self,
        outline: &O,
        rng: &mut ChaCha8Rng,
        region: &CollisionRegion,
    ) -> Result<Vec<Event>>
    where
        O: Outline + ?Sized,
    {
        let first = &region.events()[0];
        let cell = outline.at(first.pos.x, first.pos.y)?;
        let r = region.rect();
        let z = self.cfg.z_waterfall;
        log::debug!("resolving {:?} region covering {:?}", region.kind(), r);

        let stairs = cell.catalog.stairs.as_ref();
        let falls = cell.catalog.waterfall.as_ref();

        let events = match region.kind() {
            CollisionKind::StairsNorthSouth => stairs
                .and_then(|t| t.ns.as_ref())
                .map(|f| f.fill_rect(rng, r.expand_y(1, 1), z, &presets::road())),
            CollisionKind::StairsSouthNorth => stairs
                .and_then(|t| t.sn.as_ref())
                .map(|f| f.fill_rect(rng, r, z, &presets::road())),
            CollisionKind::StairsEastWest => stairs
                .and_then(|t| t.ew.as_ref())
                .map(|f| f.fill_rect(rng, r.expand_y(0, -1), z, &presets::road())),
            CollisionKind::StairsWestEast => stairs
                .and_then(|t| t.we.as_ref())
                .map(|f| f.fill_rect(rng, r.expand_y(0, -1), z, &presets::road())),
            CollisionKind::WaterfallNorthSouth => falls
                .and_then(|t| t.ns.as_ref())
                .map(|f| f.fill_rect(rng, r, z, &presets::waterfall())),
            CollisionKind::WaterfallSouthNorth => falls
                .and_then(|t| t.sn.as_ref())
                .map(|l| l.fill_rect(rng, r.expand_y(0, 1), z, &presets::waterfall())),
            CollisionKind::WaterfallEastWest => falls
                .and_then(|t| t.ew.as_ref())
                .map(|f| f.fill_rect(rng, r, z, &presets::waterfall())),
            CollisionKind::WaterfallWestEast => falls
                .and_then(|t| t.we.as_ref())
                .map(|f| f.fill_rect(rng, r, z, &presets::waterfall())),
        };

        Ok(events.unwrap_or_else(|| {
            log::debug!(
                "no {:?} tiles in catalog, dropping region at {:?}",
                region.kind(),
                r
            );
            Vec::new()
        }))
    }
}

/// Per-map seed derived from the global seed and the region's corners, so a
/// map's RNG stream is independent of scheduling and worker count.
fn map_seed(seed: u64, region: Rect) -> u64 {
    let a = (region.min.x as i64).wrapping_mul(region.max.y as i64);
    let b = (region.max.x as i64).wrapping_mul(region.min.y as i64);
    seed.wrapping_add(a.wrapping_sub(b) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CliffTileset, FallFace, FallLip, LandCatalog, Tileset, WaterfallTiles,
    };
    use crate::config::AutotilerConfigBuilder;
    use glam::IVec2;
    use std::sync::Arc;

    fn tileset(prefix: &str) -> Tileset {
        let t = |r: &str| vec![format!("{prefix}-{r}")];
        Tileset {
            full: t("full"),
            north_half: t("north-half"),
            east_half: t("east-half"),
            south_half: t("south-half"),
            west_half: t("west-half"),
            quarter_north_east: t("1q-ne"),
            quarter_south_east: t("1q-se"),
            quarter_south_west: t("1q-sw"),
            quarter_north_west: t("1q-nw"),
            three_quarter_north_east: t("3q-ne"),
            three_quarter_south_east: t("3q-se"),
            three_quarter_south_west: t("3q-sw"),
            three_quarter_north_west: t("3q-nw"),
        }
    }

    fn ground(name: &str) -> GroundTiles {
        GroundTiles {
            full: vec![format!("{name}.full")],
            transition: vec![format!("{name}.trans")],
        }
    }

    fn cliffs() -> CliffTileset {
        CliffTileset {
            north_half: vec!["cliff-n".into()],
            north_half_base: vec!["cliff-n-base".into()],
            south_half: vec!["cliff-s".into()],
            south_half_base: vec!["cliff-s-base".into()],
            east_half: vec!["cliff-e".into()],
            west_half: vec!["cliff-w".into()],
            quarter_north_east: vec!["cliff-1q-ne".into()],
            quarter_north_east_base: vec!["cliff-1q-ne-base".into()],
            quarter_south_east: vec!["cliff-1q-se".into()],
            quarter_south_west: vec!["cliff-1q-sw".into()],
            quarter_north_west: vec!["cliff-1q-nw".into()],
            quarter_north_west_base: vec!["cliff-1q-nw-base".into()],
            three_quarter_north_east: vec!["cliff-3q-ne".into()],
            three_quarter_north_west: vec!["cliff-3q-nw".into()],
        }
    }

    fn falls() -> WaterfallTiles {
        let f = |r: &str| vec![format!("wf-{r}")];
        WaterfallTiles {
            ns: Some(FallFace {
                left_top: f("left-top"),
                left_centre: f("left-centre"),
                left_bottom: f("left-bottom"),
                mid_top: f("mid-top"),
                mid_centre: f("mid-centre"),
                mid_bottom: f("mid-bottom"),
                right_top: f("right-top"),
                right_centre: f("right-centre"),
                right_bottom: f("right-bottom"),
            }),
            sn: Some(FallLip {
                mid_top: vec!["wf-lip".into()],
            }),
            ew: None,
            we: None,
        }
    }

    fn test_catalog() -> Arc<LandCatalog> {
        Arc::new(LandCatalog {
            name: "test".into(),
            null: Some("void.png".into()),
            grass: Some(ground("grass")),
            sand: Some(ground("sand")),
            dirt: Some(ground("dirt")),
            snow: Some(ground("snow")),
            rock: Some(ground("rock")),
            water: Some(tileset("water")),
            road: Some(tileset("road")),
            bridge: Some(tileset("bridge")),
            lava: Some(tileset("lava")),
            cliff: Some(cliffs()),
            waterfall: Some(falls()),
            stairs: None,
        })
    }

    /// Outline built from rows of characters:
    /// `~` water, `g` grass, `r` road, `b` bridge (water + road), `m` lava,
    /// `^` high land, `W` high water, `w` low water, anything else null.
    /// Coordinates are clamped to the grid so edge cells see repeated
    /// terrain.
    struct GridOutline {
        rows: Vec<&'static str>,
        catalog: Arc<LandCatalog>,
        user_tags: Vec<String>,
    }

    impl GridOutline {
        fn new(rows: &[&'static str]) -> Self {
            Self {
                rows: rows.to_vec(),
                catalog: test_catalog(),
                user_tags: Vec::new(),
            }
        }
    }

    impl Outline for GridOutline {
        fn bounds(&self) -> Rect {
            Rect::new(
                IVec2::ZERO,
                IVec2::new(
                    self.rows[0].len() as i32 - 1,
                    self.rows.len() as i32 - 1,
                ),
            )
        }

        fn at(&self, x: i32, y: i32) -> Result<Cell> {
            let cx = x.clamp(0, self.rows[0].len() as i32 - 1) as usize;
            let cy = y.clamp(0, self.rows.len() as i32 - 1) as usize;
            let ch = self.rows[cy].as_bytes()[cx] as char;

            let mut cell = Cell::null_at(IVec2::new(x, y), self.catalog.clone());
            cell.null = false;
            cell.temperature = 20;
            cell.height = 10;
            cell.tags = self.user_tags.clone();
            match ch {
                '~' => cell.water = true,
                'g' => {}
                'r' => cell.road = true,
                'b' => {
                    cell.road = true;
                    cell.water = true;
                }
                'm' => cell.molten = true,
                '^' => cell.height = 250,
                'W' => {
                    cell.water = true;
                    cell.height = 250;
                }
                'w' => {
                    cell.water = true;
                    cell.height = 150;
                }
                _ => cell.null = true,
            }
            Ok(cell)
        }
    }

    fn tiler() -> Autotiler {
        let cfg = AutotilerConfigBuilder::new().seed(42).build().unwrap();
        Autotiler::new(cfg).unwrap()
    }

    fn render(rows: &[&'static str]) -> (Autotiler, MapBuffer) {
        let o = GridOutline::new(rows);
        let at = tiler();
        let mut buf = MapBuffer::new();
        at.render_map(&o, o.bounds(), &mut buf).unwrap();
        (at, buf)
    }

    fn src_at(buf: &MapBuffer, x: i32, y: i32, z: i32) -> Option<&str> {
        buf.tile_at(x, y, z).map(|e| e.src.as_str())
    }

    #[test]
    fn test_surrounded_water_gets_full_piece() {
        let (at, buf) = render(&["~~~", "~~~", "~~~"]);
        let z = at.config().z_water;
        assert_eq!(src_at(&buf, 1, 1, z), Some("water-full"));
        // the ground beneath the water is beach sand
        assert_eq!(src_at(&buf, 1, 1, at.config().z_land), Some("sand.full"));
    }

    #[test]
    fn test_single_dry_north_neighbor_gets_south_half() {
        let (at, buf) = render(&["~g~", "~~~", "~~~"]);
        assert_eq!(
            src_at(&buf, 1, 1, at.config().z_water),
            Some("water-south-half")
        );
    }

    #[test]
    fn test_cliff_facing_north_places_base_below() {
        // low ground north of a high plateau
        let (at, buf) = render(&["ggg", "^^^", "^^^"]);
        let z = at.config().z_cliff;
        assert_eq!(src_at(&buf, 1, 1, z), Some("cliff-s"));
        assert_eq!(src_at(&buf, 1, 2, z), Some("cliff-s-base"));
    }

    #[test]
    fn test_events_outside_region_are_dropped() {
        let o = GridOutline::new(&["ggg", "^^^", "^^^"]);
        let at = tiler();
        let mut buf = MapBuffer::new();
        // exclude the bottom row; the base piece for (1,1) lands there
        let region = Rect::new(IVec2::new(0, 0), IVec2::new(2, 1));
        at.render_map(&o, region, &mut buf).unwrap();

        let z = at.config().z_cliff;
        assert_eq!(src_at(&buf, 1, 1, z), Some("cliff-s"));
        assert_eq!(src_at(&buf, 1, 2, z), None);
    }

    #[test]
    fn test_bridge_over_water_road() {
        let (at, buf) = render(&["bbb", "bbb", "bbb"]);
        assert_eq!(src_at(&buf, 1, 1, at.config().z_water), Some("water-full"));
        assert_eq!(src_at(&buf, 1, 1, at.config().z_road), Some("bridge-full"));
    }

    #[test]
    fn test_lava_placed_at_water_layer() {
        let (at, buf) = render(&["mmm", "mmm", "mmm"]);
        assert_eq!(src_at(&buf, 1, 1, at.config().z_water), Some("lava-full"));
    }

    #[test]
    fn test_null_cells_place_only_the_null_tile() {
        let (at, buf) = render(&["...", "...", "..."]);
        assert_eq!(buf.len(), 9);
        assert_eq!(src_at(&buf, 1, 1, at.config().z_land), Some("void.png"));
    }

    #[test]
    fn test_waterfall_over_cliff() {
        // a wide river flowing south over a cliff edge
        let (at, buf) = render(&["WWWWW", "WWWWW", "wwwww"]);
        let z = at.config().z_waterfall;
        // the whole cliff row merges into one region; single-row fills use
        // the top sub-pieces
        assert_eq!(src_at(&buf, 0, 1, z), Some("wf-left-top"));
        assert_eq!(src_at(&buf, 2, 1, z), Some("wf-mid-top"));
        assert_eq!(src_at(&buf, 4, 1, z), Some("wf-right-top"));
    }

    #[test]
    fn test_same_seed_same_map() {
        let o = GridOutline::new(&["WWWWW", "WWWWW", "wwwww"]);
        let at = tiler();
        let mut a = MapBuffer::new();
        let mut b = MapBuffer::new();
        at.render_map(&o, o.bounds(), &mut a).unwrap();
        at.render_map(&o, o.bounds(), &mut b).unwrap();
        assert_eq!(a.log(), b.log());
        assert!(!a.log().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let o = GridOutline::new(&["~~~ggg", "~~gg~~", "g~~~~g"]);
        let at = tiler();
        let r1 = Rect::new(IVec2::new(0, 0), IVec2::new(2, 2));
        let r2 = Rect::new(IVec2::new(3, 0), IVec2::new(5, 2));

        let maps = at.render_maps(&o, &[r1, r2]).unwrap();
        assert_eq!(maps.len(), 2);

        let mut b1 = MapBuffer::new();
        at.render_map(&o, r1, &mut b1).unwrap();
        let mut b2 = MapBuffer::new();
        at.render_map(&o, r2, &mut b2).unwrap();

        assert_eq!(maps[0].log(), b1.log());
        assert_eq!(maps[1].log(), b2.log());
    }

    #[test]
    fn test_tags_at_terrain_priorities() {
        let water = GridOutline::new(&["~~~", "~~~", "~~~"]);
        let at = tiler();
        assert_eq!(at.tags_at(&water, 1, 1).unwrap(), vec!["water"]);

        let land = GridOutline::new(&["ggg", "ggg", "ggg"]);
        assert_eq!(at.tags_at(&land, 1, 1).unwrap(), vec!["grass"]);

        let void = GridOutline::new(&["...", "...", "..."]);
        assert_eq!(at.tags_at(&void, 1, 1).unwrap(), vec!["null"]);
    }

    #[test]
    fn test_tags_at_cliff_face_and_edge() {
        // a plateau falling away to the south; the middle row is the face,
        // the row behind it the edge
        let o = GridOutline::new(&["^^^", "^^^", "ggg"]);
        let at = tiler();
        assert_eq!(at.tags_at(&o, 1, 1).unwrap(), vec!["cliff-face"]);
        assert_eq!(at.tags_at(&o, 1, 0).unwrap(), vec!["cliff-edge"]);
        assert_eq!(at.tags_at(&o, 1, 2).unwrap(), vec!["grass"]);
    }

    #[test]
    fn test_tags_at_appends_user_tags() {
        let mut o = GridOutline::new(&["~~~", "~~~", "~~~"]);
        o.user_tags = vec!["region:7".to_string()];
        let at = tiler();
        assert_eq!(at.tags_at(&o, 1, 1).unwrap(), vec!["region:7", "water"]);
    }

    #[test]
    fn test_observer_sees_every_placement() {
        let o = GridOutline::new(&["...", "...", "..."]);
        let mut at = tiler();
        let rx = at.observe();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let mut buf = MapBuffer::new();
                at.render_map(&o, o.bounds(), &mut buf).unwrap();
                buf
            });

            // 9 null cells, one placement each
            let seen: Vec<Event> = rx.iter().take(9).collect();
            let buf = handle.join().unwrap();

            assert_eq!(seen.len(), buf.log().len());
            assert!(seen.iter().all(|e| e.src == "void.png"));
        });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = AutotilerConfigBuilder::new().seed(1).build().unwrap();
        cfg.workers = 0;
        assert!(Autotiler::new(cfg).is_err());

        let mut cfg = AutotilerConfigBuilder::new().seed(1).build().unwrap();
        cfg.vegetation_min_temp = 50;
        cfg.vegetation_max_temp = 10;
        assert!(Autotiler::new(cfg).is_err());
    }

    #[test]
    fn test_map_seed_varies_by_region() {
        let a = map_seed(7, Rect::new(IVec2::new(0, 0), IVec2::new(9, 9)));
        let b = map_seed(7, Rect::new(IVec2::new(10, 0), IVec2::new(19, 9)));
        assert_ne!(a, b);
    }
}
