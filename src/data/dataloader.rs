// --- Файл: src/data/dataloader.rs ---

//! DataLoader - итератор по батчам данных в памяти.

use super::dataset::InMemoryDataset;
use crate::error::{Result, TrainError};
use crate::tensor::{Labels, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Батч данных - пара (features, labels) и индексы строк датасета.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Признаки батча
    pub features: Tensor,
    /// Метки батча
    pub labels: Labels,
    /// Индексы строк батча в датасете
    pub indices: Vec<usize>,
}

impl Batch {
    pub fn new(features: Tensor, labels: Labels, indices: Vec<usize>) -> Self {
        Self {
            features,
            labels,
            indices,
        }
    }

    /// Количество примеров в батче.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Источник батчей поверх датасета.
///
/// Каждый вызов [`DataLoader::iter`] - один полный проход. Без `drop_last`
/// каждая строка попадает ровно в один батч за проход, последний батч может
/// быть короче.
///
/// # Пример
///
/// ```rust,ignore
/// let mut loader = DataLoader::new(&features, &labels, 32)?
///     .shuffle(true)
///     .seed(7);
///
/// for batch in loader.iter() {
///     println!("Batch size: {}", batch.len());
/// }
/// ```
pub struct DataLoader<'a> {
    dataset: InMemoryDataset<'a>,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    passes: u64,
}

impl<'a> DataLoader<'a> {
    /// Создает последовательный загрузчик без отбрасывания батчей.
    ///
    /// Ошибка, если `batch_size` равен нулю или число строк `features` и
    /// `labels` различается.
    pub fn new(features: &'a Tensor, labels: &'a Labels, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(TrainError::InvalidBatchSize);
        }
        Ok(Self {
            dataset: InMemoryDataset::new(features, labels)?,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
            passes: 0,
        })
    }

    /// Включает или выключает перемешивание на каждом проходе.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Отбрасывает последний неполный батч.
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Seed для перемешивания. Проход `k` использует `seed + k`: эпохи
    /// различаются, а повторный запуск их воспроизводит.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Количество батчей за один проход.
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// Количество примеров в датасете.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Начинает новый проход по датасету.
    pub fn iter(&mut self) -> DataLoaderIterator<'a> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.passes)),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }
        if self.drop_last {
            order.truncate(self.num_batches() * self.batch_size);
        }
        self.passes += 1;

        DataLoaderIterator {
            dataset: self.dataset,
            order,
            batch_size: self.batch_size,
            cursor: 0,
        }
    }
}

/// Итератор по батчам одного прохода.
pub struct DataLoaderIterator<'a> {
    dataset: InMemoryDataset<'a>,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl<'a> Iterator for DataLoaderIterator<'a> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let indices = self.order[self.cursor..end].to_vec();
        self.cursor = end;

        let (features, labels) = self.dataset.select(&indices);
        Some(Batch::new(features, labels, indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DataLoaderIterator<'_> {}
