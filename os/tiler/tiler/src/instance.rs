use crate::packing::{self, PackedAllocation};
use crate::{BlockInfo, TilerError, TilerStats};
use alloc::vec::Vec;
use log::{debug, error, info, warn};
use tiler_addresses::{GridPoint, Orientation, PixelFormat, PixelPoint, TiledAddress, block_size};
use tiler_alloc::dma::{DmaAlloc, DmaBuffer};
use tiler_alloc::{PageGroup, PagePool, PageSource};
use tiler_container::{Area, AreaBacking, Container2D, Rect, Rejected};
use tiler_info::{RefillMode, TilerConfig};
use tiler_pat::PatProgrammer;
use tiler_registers::barrier::write_barrier;
use tiler_registers::{PatArea, PatDescriptor, RegisterBlock};
use tiler_sync::SpinLock;

/// Resources handed back by [`Tiler::shutdown`].
pub struct TilerParts<S, D, R> {
    pub source: S,
    pub dma: D,
    pub registers: R,
}

/// A faulted block and the refill descriptor the engine may still read.
struct Quarantined {
    area: Area<AreaBacking>,
    descriptor: Option<DmaBuffer>,
}

/// A refill that did not complete. A faulted automatic refill keeps its
/// descriptor so it is not reused while the engine may still walk it.
struct RefillFailure {
    error: TilerError,
    descriptor: Option<DmaBuffer>,
}

impl From<TilerError> for RefillFailure {
    fn from(error: TilerError) -> Self {
        Self {
            error,
            descriptor: None,
        }
    }
}

/// One tiler instance: page pool, slot grid and PAT programmer.
///
/// Every operation takes `&self`. The pool, the grid, the DMA allocator and
/// the PAT programmer each sit behind their own lock and no call path holds
/// two of them at once.
pub struct Tiler<S, D, R> {
    config: TilerConfig,
    pool: PagePool<S>,
    dma: SpinLock<D>,
    container: Container2D<AreaBacking>,
    pat: SpinLock<PatProgrammer<R>>,
    quarantine: SpinLock<Vec<Quarantined>>,
}

impl<S, D, R> Tiler<S, D, R>
where
    S: PageSource,
    D: DmaAlloc,
    R: RegisterBlock,
{
    /// Validate `config`, program the PAT global configuration and start with
    /// an empty grid and pool.
    ///
    /// # Errors
    /// [`TilerError::Config`] for an invalid configuration.
    pub fn new(config: TilerConfig, source: S, dma: D, registers: R) -> Result<Self, TilerError> {
        config.validate()?;

        let pat = PatProgrammer::new(registers, &config);
        pat.init(config.refill_mode());

        info!(
            "tiler up: refill batch {}, {:?} refill on engine {}",
            config.refill_batch(),
            config.refill_mode(),
            config.engine()
        );
        Ok(Self {
            config,
            pool: PagePool::new(source, config.refill_batch()),
            dma: SpinLock::new(dma),
            container: Container2D::with_hardware_geometry(),
            pat: SpinLock::new(pat),
            quarantine: SpinLock::new(Vec::new()),
        })
    }

    #[inline]
    pub const fn config(&self) -> &TilerConfig {
        &self.config
    }

    /// Allocate a `width`×`height` block of `format` and map it.
    ///
    /// For [`PixelFormat::Page`] the width is a byte length and the height is
    /// ignored. The returned address is the block's base in the natural view.
    ///
    /// # Errors
    /// - [`TilerError::Codec`] for an unsupported size.
    /// - [`TilerError::Pool`] / [`TilerError::Dma`] when memory runs out.
    /// - [`TilerError::Container`] when the grid has no room.
    /// - [`TilerError::Busy`] when the refill engine did not accept the area.
    /// - [`TilerError::InvalidEngine`] when the configured engine does not
    ///   exist.
    /// - [`TilerError::HardwareFault`] when the refill failed; the block is
    ///   quarantined.
    pub fn allocate(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TiledAddress, TilerError> {
        let size = block_size(format, width, height)?;
        let pages = self.pool.acquire_group(size.pages())?;

        let table = self.dma.with_lock(|dma| {
            let mut table = dma.alloc(size.pages())?;
            let written = table
                .write_page_table(&pages)
                .and_then(|()| table.bus_address());
            match written {
                Ok(bus) => Ok((table, bus)),
                Err(err) => {
                    dma.free(table);
                    Err(err)
                }
            }
        });
        let (table, table_bus) = match table {
            Ok(table) => table,
            Err(err) => {
                self.release_pages(pages);
                return Err(err.into());
            }
        };
        write_barrier();

        let backing = AreaBacking::new(format, width, height, pages, table);
        let rect = match self.container.place(size.width, size.height, backing) {
            Ok(rect) => rect,
            Err(Rejected { error, backing }) => {
                if let Err(release_err) = self.release_backing(backing) {
                    error!("releasing unplaced block failed: {release_err}");
                }
                return Err(error.into());
            }
        };

        if let Err(RefillFailure { error, descriptor }) = self.refill(rect, table_bus) {
            self.discard(rect, &error, descriptor);
            return Err(error);
        }

        let addr = TiledAddress::encode(format, rect.origin(), Orientation::NATURAL)?;
        debug!("allocated {format:?} {width}x{height} at {rect:?} as {addr}");
        Ok(addr)
    }

    /// Unmap and free the block at `addr`, in any orientation.
    ///
    /// # Errors
    /// [`TilerError::NotFound`] if no block of that format starts there.
    pub fn free(&self, addr: TiledAddress) -> Result<(), TilerError> {
        let base = self.base_of(addr)?;
        let area = self.container.remove(base.x, base.y)?;
        debug!("freeing {:?}", area.rect());
        self.release_backing(area.into_backing())
    }

    /// Describe the block at `addr`.
    ///
    /// # Errors
    /// [`TilerError::NotFound`] if no block of that format starts there.
    pub fn query(&self, addr: TiledAddress) -> Result<BlockInfo, TilerError> {
        let decoded = addr.decode();
        self.container
            .with_area(decoded.grid.x, decoded.grid.y, |area| {
                let backing = area.backing();
                BlockInfo {
                    format: backing.format(),
                    width: backing.width(),
                    height: backing.height(),
                    rect: area.rect(),
                    page_count: area.page_count(),
                    table: backing.table().phys(),
                }
            })
            .filter(|info| info.format == decoded.format)
            .ok_or(TilerError::NotFound(addr))
    }

    /// The address of the same base pixel seen through `orientation`.
    ///
    /// Touches neither memory nor the page table.
    #[must_use]
    pub const fn reorient(&self, addr: TiledAddress, orientation: Orientation) -> TiledAddress {
        addr.reorient(orientation)
    }

    /// Address of the first pixel of the block at `addr` when scanned
    /// through `orientation`: mirrored views start at the far edge.
    ///
    /// # Errors
    /// [`TilerError::NotFound`] if no block starts at `addr`.
    pub fn view_address(
        &self,
        addr: TiledAddress,
        orientation: Orientation,
    ) -> Result<TiledAddress, TilerError> {
        let info = self.query(addr)?;
        let base = addr.decode().pixel;
        if !info.format.is_2d() {
            return Ok(addr.reorient(orientation));
        }

        let x = if orientation.x_invert() {
            base.x + info.width - 1
        } else {
            base.x
        };
        let y = if orientation.y_invert() {
            base.y + info.height - 1
        } else {
            base.y
        };
        Ok(TiledAddress::encode_pixel(
            info.format,
            PixelPoint { x, y },
            orientation,
        )?)
    }

    /// Allocate `count` buffers of `width`×`height`, packing several side by
    /// side into one block as long as the block stays within `max_width`.
    ///
    /// On failure every block allocated so far is freed again.
    ///
    /// # Errors
    /// - [`TilerError::BadPacking`] if a single buffer is wider than
    ///   `max_width`, or for the page format.
    /// - Any error of [`allocate`](Self::allocate).
    pub fn allocate_packed(
        &self,
        format: PixelFormat,
        count: usize,
        width: u32,
        height: u32,
        max_width: u32,
    ) -> Result<PackedAllocation, TilerError> {
        let bad = TilerError::BadPacking {
            count,
            width,
            max_width,
        };
        if !format.is_2d() || count == 0 {
            return Err(bad);
        }

        let slot_width = format.geometry().width;
        let stride = u32::from(block_size(format, width, height)?.width) * slot_width;
        let per_row = usize::try_from(max_width / stride).map_err(|_| bad)?;
        if per_row == 0 {
            return Err(bad);
        }

        let mut packed = PackedAllocation::default();
        for group in packing::plan(count, per_row) {
            let group_width = u32::try_from(group).map_err(|_| bad)? * stride;
            let base = match self.allocate(format, group_width, height) {
                Ok(base) => base,
                Err(err) => {
                    for (group, undo_err) in self.free_packed(&packed) {
                        error!("unwinding packed block {group} failed: {undo_err}");
                    }
                    return Err(err);
                }
            };
            packed.groups.push(base);

            let origin = base.decode().pixel;
            for i in 0..group {
                let offset = u32::try_from(i).map_err(|_| bad)? * stride;
                let pixel = PixelPoint {
                    x: origin.x + offset,
                    y: origin.y,
                };
                packed.buffers.push(TiledAddress::encode_pixel(
                    format,
                    pixel,
                    Orientation::NATURAL,
                )?);
            }
        }

        debug!(
            "packed {count} buffers into {} blocks of at most {per_row}",
            packed.groups.len()
        );
        Ok(packed)
    }

    /// Free every block of a packed allocation. Returns the blocks that
    /// could not be freed.
    pub fn free_packed(&self, packed: &PackedAllocation) -> Vec<(TiledAddress, TilerError)> {
        packed
            .groups
            .iter()
            .filter_map(|&group| self.free(group).err().map(|err| (group, err)))
            .collect()
    }

    /// Rectangles of the blocks held back after a refill fault.
    #[must_use]
    pub fn quarantined(&self) -> Vec<Rect> {
        self.quarantine
            .with_lock(|q| q.iter().map(|entry| entry.area.rect()).collect())
    }

    /// Return the memory of every quarantined block to the pool and free
    /// any refill descriptor held with it. Call only after the refill engine
    /// was reset.
    ///
    /// Returns the number of pages reclaimed.
    ///
    /// # Errors
    /// The first release failure; the remaining blocks are still reclaimed.
    pub fn reclaim_quarantined(&self) -> Result<usize, TilerError> {
        let entries = self.quarantine.with_lock(core::mem::take);
        let mut pages = 0;
        let mut first_err = None;
        for Quarantined { area, descriptor } in entries {
            if let Some(descriptor) = descriptor {
                self.dma.with_lock(|dma| dma.free(descriptor));
            }
            let count = area.page_count();
            match self.release_backing(area.into_backing()) {
                Ok(()) => pages += count,
                Err(err) => {
                    error!("reclaiming quarantined area failed: {err}");
                    first_err.get_or_insert(err);
                }
            }
        }
        if pages > 0 {
            info!("reclaimed {pages} quarantined pages");
        }
        first_err.map_or(Ok(pages), Err)
    }

    #[must_use]
    pub fn stats(&self) -> TilerStats {
        TilerStats {
            pool: self.pool.stats(),
            areas: self.container.len(),
            occupied_slots: self.container.occupied_slots(),
            quarantined: self.quarantine.with_lock(|q| q.len()),
        }
    }

    /// Free every block, reclaim the quarantine and drain the pool.
    ///
    /// # Errors
    /// [`TilerError::Pool`] if pages remain in use after all blocks were
    /// released.
    pub fn shutdown(self) -> Result<TilerParts<S, D, R>, TilerError> {
        let areas = self.container.drain();
        let count = areas.len();
        for area in areas {
            let rect = area.rect();
            if let Err(err) = self.release_backing(area.into_backing()) {
                error!("releasing {rect:?} during shutdown failed: {err}");
            }
        }
        if let Err(err) = self.reclaim_quarantined() {
            error!("reclaiming quarantine during shutdown failed: {err}");
        }

        let drained = self.pool.drain()?;
        info!("tiler down: freed {count} blocks, returned {drained} pages");
        Ok(TilerParts {
            source: self.pool.into_source(),
            dma: self.dma.into_inner(),
            registers: self.pat.into_inner().into_registers(),
        })
    }

    /// Grid slot of the block `addr` points at, checked against the format.
    fn base_of(&self, addr: TiledAddress) -> Result<GridPoint, TilerError> {
        let decoded = addr.decode();
        let base = decoded.grid;
        match self
            .container
            .with_area(base.x, base.y, |a| a.backing().format())
        {
            Some(format) if format == decoded.format => Ok(base),
            _ => Err(TilerError::NotFound(addr)),
        }
    }

    /// Bind the pages of the area at `rect` through the configured engine.
    fn refill(&self, rect: Rect, table: u32) -> Result<(), RefillFailure> {
        let engine = self.config.engine();
        let area = pat_area(rect);

        match self.config.refill_mode() {
            RefillMode::Manual => self
                .pat
                .with_lock(|pat| pat.refill_manual(engine, area, table))
                .map_err(|err| TilerError::from_refill(err).into()),
            RefillMode::Automatic => {
                let descriptor = self.pat.with_lock(|pat| pat.descriptor(area, table));

                let mut buffer = self
                    .dma
                    .with_lock(|dma| dma.alloc(PatDescriptor::WORDS))
                    .map_err(TilerError::from)?;
                buffer.as_mut_slice().copy_from_slice(&descriptor.to_words());
                write_barrier();

                let result = buffer.bus_address().map_err(TilerError::from).and_then(|bus| {
                    self.pat
                        .with_lock(|pat| {
                            pat.refill_auto(engine, bus)?;
                            pat.wait_completion(engine)
                        })
                        .map_err(TilerError::from_refill)
                });
                match result {
                    Err(error) if error.is_hardware_fault() => Err(RefillFailure {
                        error,
                        descriptor: Some(buffer),
                    }),
                    result => {
                        self.dma.with_lock(|dma| dma.free(buffer));
                        result.map_err(RefillFailure::from)
                    }
                }
            }
        }
    }

    /// Take a placed area back out after its refill failed. Faulted areas
    /// are quarantined together with their descriptor; anything else is
    /// released.
    fn discard(&self, rect: Rect, err: &TilerError, descriptor: Option<DmaBuffer>) {
        let area = match self.container.remove(rect.x0, rect.y0) {
            Ok(area) => area,
            Err(remove_err) => {
                error!("area {rect:?} vanished before cleanup: {remove_err}");
                return;
            }
        };

        if err.is_hardware_fault() {
            warn!("quarantining {rect:?} after {err}");
            self.quarantine
                .with_lock(|q| q.push(Quarantined { area, descriptor }));
            return;
        }

        debug!("refill of {rect:?} not started ({err}), releasing");
        if let Some(descriptor) = descriptor {
            self.dma.with_lock(|dma| dma.free(descriptor));
        }
        if let Err(release_err) = self.release_backing(area.into_backing()) {
            error!("releasing block memory failed: {release_err}");
        }
    }

    /// Free the table and return the pages of a block that left the grid.
    fn release_backing(&self, backing: AreaBacking) -> Result<(), TilerError> {
        backing
            .release(&self.pool, &mut &self.dma)
            .map_err(|rejected| {
                warn!(
                    "pool refused {} pages, keeping them out of circulation",
                    rejected.pages.len()
                );
                rejected.error.into()
            })
    }

    fn release_pages(&self, pages: PageGroup) {
        if let Err(rejected) = self.pool.release_group(pages) {
            error!("returning {} pages failed: {}", rejected.pages.len(), rejected.error);
        }
    }
}

/// The PAT area register for a grid rectangle. Grid coordinates are at most
/// 255 wide and 127 high and always fit.
#[allow(clippy::cast_possible_truncation)]
const fn pat_area(rect: Rect) -> PatArea {
    PatArea::from_corners(rect.x0 as u8, rect.y0 as u8, rect.x1 as u8, rect.y1 as u8)
}
